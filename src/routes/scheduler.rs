use axum::{Json, Router, extract::State, routing::post};
use time::OffsetDateTime;

use crate::{dto::scheduler::TickResponse, services::scheduler, state::SharedState};

/// Routes for externally triggered scheduler passes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/scheduler/tick", post(trigger_tick))
}

/// Run one scheduler pass now.
///
/// Intended for an external cron trigger; the in-process interval loop
/// runs the same pass, and overlapping invocations are safe. The counts
/// exist for observability only.
#[utoipa::path(
    post,
    path = "/scheduler/tick",
    tag = "scheduler",
    responses((status = 200, description = "Tick executed", body = TickResponse))
)]
pub async fn trigger_tick(State(state): State<SharedState>) -> Json<TickResponse> {
    let report = scheduler::tick(&state, OffsetDateTime::now_utc()).await;
    Json(report.into())
}
