/// Admin operations: rounds, games, result finalization.
pub mod admin_service;
/// Bet submission and per-round game listings.
pub mod bet_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Push notification dispatch.
pub mod notification_service;
/// Read-only round and ranking queries.
pub mod public_service;
/// Bet locking and reminder scheduler.
pub mod scheduler;
/// User registration and push subscriptions.
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;
