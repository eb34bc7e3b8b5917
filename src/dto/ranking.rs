use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One row of the standings.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct RankingEntry {
    /// 1-based position in the standings.
    pub position: usize,
    /// Identifier of the user.
    pub id: Uuid,
    /// Display name.
    pub nickname: String,
    /// Cumulative points.
    pub points_total: i64,
}
