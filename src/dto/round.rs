use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{RoundEntity, RoundStatus},
    dto::{format_timestamp, validation::validate_display_name},
};

/// Payload used to open a new round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoundRequest {
    /// Display name of the round.
    #[validate(custom(function = "validate_display_name"))]
    pub name: String,
}

/// Public projection of a round.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct RoundSummary {
    /// Identifier of the round.
    pub id: Uuid,
    /// Display name of the round.
    pub name: String,
    /// Open or closed.
    pub status: RoundStatus,
    /// Creation timestamp as RFC 3339.
    pub created_at: String,
}

impl From<RoundEntity> for RoundSummary {
    fn from(round: RoundEntity) -> Self {
        Self {
            id: round.id,
            name: round.name,
            status: round.status,
            created_at: format_timestamp(round.created_at),
        }
    }
}
