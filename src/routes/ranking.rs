use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    dto::ranking::RankingEntry, error::AppError, services::public_service, state::SharedState,
};

const DEFAULT_RANKING_LIMIT: usize = 100;

/// Routes exposing the standings.
pub fn router() -> Router<SharedState> {
    Router::new().route("/ranking", get(ranking))
}

#[derive(Debug, Deserialize, IntoParams)]
/// Query parameters accepted by the ranking route.
pub struct RankingQuery {
    /// Maximum number of rows to return (default 100).
    pub limit: Option<usize>,
}

/// Standings ordered by total points, ties in a stable order.
#[utoipa::path(
    get,
    path = "/ranking",
    tag = "ranking",
    params(RankingQuery),
    responses((status = 200, description = "Ordered standings", body = [RankingEntry]))
)]
pub async fn ranking(
    State(state): State<SharedState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<RankingEntry>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_RANKING_LIMIT);
    Ok(Json(public_service::ranking(&state, limit).await?))
}
