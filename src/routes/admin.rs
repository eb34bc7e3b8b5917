use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        game::{CreateGameRequest, FinalizationSummary, FinalizeGameRequest, GameSummary},
        round::{CreateRoundRequest, RoundSummary},
    },
    error::AppError,
    routes::identity::CallerId,
    services::admin_service,
    state::SharedState,
};

/// Admin-only management endpoints for rounds, games, and results.
///
/// Every handler resolves the caller through the identity header and
/// requires the admin role on the stored profile.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/rounds", post(create_round))
        .route("/admin/rounds/{id}/close", post(close_round))
        .route("/admin/games", post(create_game))
        .route("/admin/games/{id}/finalize", post(finalize_game))
}

/// Open a new round.
#[utoipa::path(
    post,
    path = "/admin/rounds",
    tag = "admin",
    params(("X-User-Id" = String, Header, description = "Admin identity")),
    request_body = CreateRoundRequest,
    responses((status = 200, description = "Round created", body = RoundSummary))
)]
pub async fn create_round(
    State(state): State<SharedState>,
    CallerId(admin_id): CallerId,
    Json(payload): Json<CreateRoundRequest>,
) -> Result<Json<RoundSummary>, AppError> {
    payload.validate()?;
    Ok(Json(
        admin_service::create_round(&state, admin_id, payload).await?,
    ))
}

/// Archive a round.
#[utoipa::path(
    post,
    path = "/admin/rounds/{id}/close",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Round to close"),
        ("X-User-Id" = String, Header, description = "Admin identity")
    ),
    responses((status = 200, description = "Round closed", body = RoundSummary))
)]
pub async fn close_round(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    CallerId(admin_id): CallerId,
) -> Result<Json<RoundSummary>, AppError> {
    Ok(Json(
        admin_service::close_round(&state, admin_id, id).await?,
    ))
}

/// Schedule a game inside an open round.
#[utoipa::path(
    post,
    path = "/admin/games",
    tag = "admin",
    params(("X-User-Id" = String, Header, description = "Admin identity")),
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameSummary),
        (status = 409, description = "Round is closed")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    CallerId(admin_id): CallerId,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<GameSummary>, AppError> {
    payload.validate()?;
    Ok(Json(
        admin_service::create_game(&state, admin_id, payload).await?,
    ))
}

/// Record a game's final score, locking and scoring every bet on it.
#[utoipa::path(
    post,
    path = "/admin/games/{id}/finalize",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Game to finalize"),
        ("X-User-Id" = String, Header, description = "Admin identity")
    ),
    request_body = FinalizeGameRequest,
    responses(
        (status = 200, description = "Game finalized and bets scored", body = FinalizationSummary),
        (status = 409, description = "Game already finalized")
    )
)]
pub async fn finalize_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    CallerId(admin_id): CallerId,
    Json(payload): Json<FinalizeGameRequest>,
) -> Result<Json<FinalizationSummary>, AppError> {
    payload.validate()?;
    Ok(Json(
        admin_service::finalize_game(&state, admin_id, id, payload).await?,
    ))
}
