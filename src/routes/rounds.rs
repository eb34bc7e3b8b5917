use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{game::GameWithBet, round::RoundSummary},
    error::AppError,
    routes::identity::MaybeCallerId,
    services::{bet_service, public_service},
    state::SharedState,
};

/// Read-only round and game listing routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rounds", get(list_rounds))
        .route("/rounds/current", get(current_round))
        .route("/rounds/{id}/games", get(list_games))
}

/// List every round, newest first.
#[utoipa::path(
    get,
    path = "/rounds",
    tag = "rounds",
    responses((status = 200, description = "All rounds", body = [RoundSummary]))
)]
pub async fn list_rounds(
    State(state): State<SharedState>,
) -> Result<Json<Vec<RoundSummary>>, AppError> {
    Ok(Json(public_service::list_rounds(&state).await?))
}

/// The round currently shown on the dashboard.
#[utoipa::path(
    get,
    path = "/rounds/current",
    tag = "rounds",
    responses(
        (status = 200, description = "Current round", body = RoundSummary),
        (status = 404, description = "No round exists yet")
    )
)]
pub async fn current_round(
    State(state): State<SharedState>,
) -> Result<Json<RoundSummary>, AppError> {
    Ok(Json(public_service::current_round(&state).await?))
}

/// Games of a round with the caller's own bets attached.
#[utoipa::path(
    get,
    path = "/rounds/{id}/games",
    tag = "rounds",
    params(
        ("id" = Uuid, Path, description = "Round identifier"),
        ("X-User-Id" = Option<String>, Header, description = "Viewer identity; bets and edit flags are resolved for this user")
    ),
    responses((status = 200, description = "Games with the viewer's bets", body = [GameWithBet]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    MaybeCallerId(viewer): MaybeCallerId,
) -> Result<Json<Vec<GameWithBet>>, AppError> {
    Ok(Json(
        bet_service::list_games_for_round(&state, id, viewer).await?,
    ))
}
