use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::BetEntity;

/// Payload used to create or replace the caller's bet on a game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitBetRequest {
    /// Guessed home score.
    #[validate(range(max = 99))]
    pub guess_a: u32,
    /// Guessed away score.
    #[validate(range(max = 99))]
    pub guess_b: u32,
}

/// Projection of a bet exposed to its owner.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct BetView {
    /// Identifier of the bet.
    pub id: Uuid,
    /// Game the guess refers to.
    pub game_id: Uuid,
    /// Guessed home score.
    pub guess_a: u32,
    /// Guessed away score.
    pub guess_b: u32,
    /// Whether the guess can no longer be changed. Advisory: the server
    /// re-checks on every write regardless.
    pub locked: bool,
    /// Points earned, present once the game's result is in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<u32>,
}

impl From<BetEntity> for BetView {
    fn from(bet: BetEntity) -> Self {
        Self {
            id: bet.id,
            game_id: bet.game_id,
            guess_a: bet.guess_a,
            guess_b: bet.guess_b,
            locked: bet.state.locked(),
            points_awarded: bet.state.points_awarded(),
        }
    }
}
