use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{FinalizedGame, GameEntity, ScoredBet},
    dto::{bet::BetView, format_timestamp, validation::validate_display_name},
};

/// Payload used to schedule a game inside a round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Round the game belongs to.
    pub round_id: Uuid,
    /// Home team display name.
    #[validate(custom(function = "validate_display_name"))]
    pub team_a: String,
    /// Away team display name.
    #[validate(custom(function = "validate_display_name"))]
    pub team_b: String,
    /// Scheduled kickoff as an RFC 3339 timestamp.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub kickoff_time: OffsetDateTime,
}

/// Payload carrying a game's final score.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FinalizeGameRequest {
    /// Final home score.
    #[validate(range(max = 99))]
    pub score_a: u32,
    /// Final away score.
    #[validate(range(max = 99))]
    pub score_b: u32,
}

/// Public projection of a game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSummary {
    /// Identifier of the game.
    pub id: Uuid,
    /// Round the game belongs to.
    pub round_id: Uuid,
    /// Home team display name.
    pub team_a: String,
    /// Away team display name.
    pub team_b: String,
    /// Scheduled kickoff as an RFC 3339 timestamp.
    pub kickoff_time: String,
    /// Whether a final result has been recorded.
    pub finished: bool,
    /// Final home score once finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_a: Option<u32>,
    /// Final away score once finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_b: Option<u32>,
}

impl From<GameEntity> for GameSummary {
    fn from(game: GameEntity) -> Self {
        let (score_a, score_b) = match game.final_score() {
            Some((a, b)) => (Some(a), Some(b)),
            None => (None, None),
        };

        Self {
            id: game.id,
            round_id: game.round_id,
            team_a: game.team_a,
            team_b: game.team_b,
            kickoff_time: format_timestamp(game.kickoff_time),
            finished: score_a.is_some(),
            score_a,
            score_b,
        }
    }
}

/// A game as seen by one viewer: their own bet (never anyone else's) and
/// whether the server would currently accept a write.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameWithBet {
    /// The game itself.
    pub game: GameSummary,
    /// The viewer's bet on this game, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_bet: Option<BetView>,
    /// Server-evaluated "a write would be accepted right now" flag.
    pub can_edit: bool,
}

/// Points one bet earned during finalization.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoredBetView {
    /// Owner of the bet.
    pub user_id: Uuid,
    /// Points credited to the owner.
    pub points: u32,
}

impl From<ScoredBet> for ScoredBetView {
    fn from(scored: ScoredBet) -> Self {
        Self {
            user_id: scored.user_id,
            points: scored.points,
        }
    }
}

/// Summary returned once a game has been finalized.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinalizationSummary {
    /// The game in its finished state.
    pub game: GameSummary,
    /// Bets force-locked by the finalization itself.
    pub bets_locked: usize,
    /// Every bet on the game with the points it earned.
    pub scored: Vec<ScoredBetView>,
}

impl From<FinalizedGame> for FinalizationSummary {
    fn from(outcome: FinalizedGame) -> Self {
        Self {
            game: outcome.game.into(),
            bets_locked: outcome.bets_locked,
            scored: outcome.scored.into_iter().map(Into::into).collect(),
        }
    }
}
