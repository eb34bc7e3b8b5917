use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role attached to a stored user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular participant who submits bets.
    Player,
    /// Administrator allowed to manage rounds, games, and results.
    Admin,
}

/// User profile persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Primary key of the user.
    pub id: Uuid,
    /// Display name shown on rankings and share cards.
    pub nickname: String,
    /// Role controlling access to admin operations.
    pub role: Role,
    /// Cumulative points across all finished games.
    pub points_total: i64,
    /// Creation timestamp for auditing/debugging.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Lifecycle status of a betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Round accepts new games and is a candidate for "current round".
    Open,
    /// Round is archived.
    Closed,
}

/// Group of games bet on together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundEntity {
    /// Primary key of the round.
    pub id: Uuid,
    /// Display name of the round.
    pub name: String,
    /// Whether the round is open or archived.
    pub status: RoundStatus,
    /// Creation timestamp; the newest open round is the "current" one.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Result state of a game. Scores exist exactly when the game is finished,
/// and a finished game never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    /// The game has not been played (or its result not recorded) yet.
    Scheduled,
    /// Final result recorded; bets on this game have been scored.
    Finished {
        /// Final score of the home team.
        score_a: u32,
        /// Final score of the away team.
        score_b: u32,
    },
}

/// Scheduled match inside a round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Round this game belongs to.
    pub round_id: Uuid,
    /// Home team display name.
    pub team_a: String,
    /// Away team display name.
    pub team_b: String,
    /// Scheduled kickoff; betting closes a configured window before it.
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff_time: OffsetDateTime,
    /// Scheduled/finished state with the final score when finished.
    pub status: GameStatus,
    /// Whether the "cutoff approaching" reminder has been sent for this
    /// game. Flips once, never back.
    pub reminder_sent: bool,
    /// Creation timestamp for auditing/debugging.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last time this game was updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl GameEntity {
    /// Whether a final result has been recorded.
    pub fn finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    /// Final score, present once the game is finished.
    pub fn final_score(&self) -> Option<(u32, u32)> {
        match self.status {
            GameStatus::Scheduled => None,
            GameStatus::Finished { score_a, score_b } => Some((score_a, score_b)),
        }
    }
}

/// Lifecycle state of a bet. The progression is strictly
/// `Open -> Locked -> Scored`; guesses are immutable outside `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BetState {
    /// The owner may still change the guess.
    Open,
    /// The cutoff passed (or results arrived); the guess is frozen.
    Locked,
    /// Points have been awarded against the final score.
    Scored {
        /// Points this bet earned.
        points: u32,
    },
}

impl BetState {
    /// Whether the guess can no longer be changed.
    pub fn locked(&self) -> bool {
        !matches!(self, BetState::Open)
    }

    /// Awarded points, present once the bet has been scored.
    pub fn points_awarded(&self) -> Option<u32> {
        match self {
            BetState::Scored { points } => Some(*points),
            _ => None,
        }
    }
}

/// A user's score guess for one game. At most one exists per
/// `(game, user)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetEntity {
    /// Primary key of the bet.
    pub id: Uuid,
    /// Game the guess refers to.
    pub game_id: Uuid,
    /// Owning user; the only writer of the guess fields.
    pub user_id: Uuid,
    /// Guessed home score.
    pub guess_a: u32,
    /// Guessed away score.
    pub guess_b: u32,
    /// Open/locked/scored progression.
    pub state: BetState,
    /// Creation timestamp for auditing/debugging.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last time the guess was updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Registered push delivery endpoint for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushSubscriptionEntity {
    /// User the endpoint belongs to.
    pub user_id: Uuid,
    /// Opaque addressable endpoint URL.
    pub endpoint: String,
    /// Registration timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Points awarded to one bet during finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredBet {
    /// The scored bet.
    pub bet_id: Uuid,
    /// Owner credited with the points.
    pub user_id: Uuid,
    /// Points added to the owner's total.
    pub points: u32,
}

/// Outcome of a successful game finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedGame {
    /// The game in its finished state.
    pub game: GameEntity,
    /// Bets force-locked by the finalization (not by an earlier tick).
    pub bets_locked: usize,
    /// Every bet on the game with the points it earned.
    pub scored: Vec<ScoredBet>,
}
