use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::user::{RegisterUserRequest, UserSummary},
    error::AppError,
    services::user_service,
    state::SharedState,
};

/// Routes handling user profile creation.
pub fn router() -> Router<SharedState> {
    Router::new().route("/users", post(register_user))
}

/// Create a user profile.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Profile created", body = UserSummary),
        (status = 409, description = "Nickname already taken")
    )
)]
pub async fn register_user(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<UserSummary>, AppError> {
    payload.validate()?;
    Ok(Json(user_service::register_user(&state, payload).await?))
}
