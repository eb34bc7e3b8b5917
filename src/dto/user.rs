use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{Role, UserEntity},
    dto::{format_timestamp, validation::validate_display_name},
};

/// Payload used to create a user profile.
///
/// Authentication happens upstream; this endpoint only stores the
/// profile, so the role field is trusted as provided.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterUserRequest {
    /// Display name shown on rankings.
    #[validate(custom(function = "validate_display_name"))]
    pub nickname: String,
    /// Optional role; defaults to player.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Public projection of a user profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    /// Identifier of the user.
    pub id: Uuid,
    /// Display name.
    pub nickname: String,
    /// Player or admin.
    pub role: Role,
    /// Cumulative points.
    pub points_total: i64,
    /// Creation timestamp as RFC 3339.
    pub created_at: String,
}

impl From<UserEntity> for UserSummary {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname,
            role: user.role,
            points_total: user.points_total,
            created_at: format_timestamp(user.created_at),
        }
    }
}
