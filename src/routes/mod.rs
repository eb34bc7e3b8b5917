use axum::Router;

use crate::state::SharedState;

pub mod admin;
pub mod bets;
pub mod docs;
pub mod health;
pub mod identity;
pub mod push;
pub mod ranking;
pub mod rounds;
pub mod scheduler;
pub mod users;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(users::router())
        .merge(rounds::router())
        .merge(bets::router())
        .merge(ranking::router())
        .merge(push::router())
        .merge(scheduler::router())
        .merge(admin::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
