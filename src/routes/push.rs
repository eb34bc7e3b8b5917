use axum::{Json, Router, extract::State, routing::put};
use validator::Validate;

use crate::{
    dto::push::SubscriptionRequest,
    error::AppError,
    routes::identity::CallerId,
    services::user_service,
    state::SharedState,
};

/// Routes managing the caller's push endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/push/subscriptions", put(subscribe).delete(unsubscribe))
}

/// Register (or refresh) a push endpoint for the caller.
#[utoipa::path(
    put,
    path = "/push/subscriptions",
    tag = "push",
    params(("X-User-Id" = String, Header, description = "Caller identity")),
    request_body = SubscriptionRequest,
    responses((status = 204, description = "Subscription stored"))
)]
pub async fn subscribe(
    State(state): State<SharedState>,
    CallerId(user_id): CallerId,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<axum::http::StatusCode, AppError> {
    payload.validate()?;
    user_service::subscribe_push(&state, user_id, payload).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Drop a push endpoint.
#[utoipa::path(
    delete,
    path = "/push/subscriptions",
    tag = "push",
    request_body = SubscriptionRequest,
    responses((status = 204, description = "Subscription removed if it existed"))
)]
pub async fn unsubscribe(
    State(state): State<SharedState>,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<axum::http::StatusCode, AppError> {
    user_service::unsubscribe_push(&state, payload).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
