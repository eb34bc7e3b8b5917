use axum::{
    Json, Router,
    extract::{Path, State},
    routing::put,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::bet::{BetView, SubmitBetRequest},
    error::AppError,
    routes::identity::CallerId,
    services::bet_service,
    state::SharedState,
};

/// Routes handling bet submission.
pub fn router() -> Router<SharedState> {
    Router::new().route("/bets/{game_id}", put(submit_bet))
}

/// Create or replace the caller's bet on a game.
///
/// The cutoff is re-evaluated server-side on every call; after it passed
/// the response is a conflict stating that betting is closed.
#[utoipa::path(
    put,
    path = "/bets/{game_id}",
    tag = "bets",
    params(
        ("game_id" = Uuid, Path, description = "Game to bet on"),
        ("X-User-Id" = String, Header, description = "Caller identity")
    ),
    request_body = SubmitBetRequest,
    responses(
        (status = 200, description = "Bet stored", body = BetView),
        (status = 409, description = "Betting closed or bet locked")
    )
)]
pub async fn submit_bet(
    State(state): State<SharedState>,
    Path(game_id): Path<Uuid>,
    CallerId(user_id): CallerId,
    Json(payload): Json<SubmitBetRequest>,
) -> Result<Json<BetView>, AppError> {
    payload.validate()?;
    Ok(Json(
        bet_service::submit_bet(&state, user_id, game_id, payload).await?,
    ))
}
