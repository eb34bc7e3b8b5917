//! Push notification dispatch.
//!
//! Sends are attempted independently and concurrently; a subset of
//! undeliverable endpoints never fails the call as a whole, and no retry
//! is scheduled here. Callers own the dedupe of logical events.

use std::sync::Arc;

use futures::future::{BoxFuture, join_all};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::{models::GameEntity, pool_store::PoolStore},
    state::SharedState,
};

/// Payload delivered to a push endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    /// Short headline shown by the receiving device.
    pub title: String,
    /// Longer human-readable text.
    pub body: String,
}

/// Reminder sent to users who have not bet on a game approaching its
/// cutoff.
pub fn game_reminder(game: &GameEntity) -> PushMessage {
    PushMessage {
        title: "Time is running out!".into(),
        body: format!(
            "You have not placed a guess for {} x {} yet. Betting closes soon!",
            game.team_a, game.team_b
        ),
    }
}

/// Announcement sent to a round's bettors once results are recorded.
pub fn results_available() -> PushMessage {
    PushMessage {
        title: "Results are in!".into(),
        body: "New final scores were recorded. Check your points!".into(),
    }
}

/// A single delivery attempt failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The endpoint no longer exists; the subscription should be pruned.
    #[error("endpoint gone")]
    Gone,
    /// The gateway rejected the message.
    #[error("delivery rejected: {0}")]
    Rejected(String),
    /// The endpoint could not be reached in time.
    #[error("delivery failed: {0}")]
    Unreachable(String),
}

/// Outbound gateway delivering one message to one endpoint.
pub trait PushSender: Send + Sync {
    /// Attempt a single delivery. Bounded by the configured timeout.
    fn send(
        &self,
        endpoint: String,
        message: PushMessage,
    ) -> BoxFuture<'static, Result<(), DeliveryError>>;
}

/// [`PushSender`] posting messages over HTTP.
pub struct WebPushSender {
    client: reqwest::Client,
}

impl WebPushSender {
    /// Build a sender whose individual deliveries time out after `timeout`.
    pub fn new(timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl PushSender for WebPushSender {
    fn send(
        &self,
        endpoint: String,
        message: PushMessage,
    ) -> BoxFuture<'static, Result<(), DeliveryError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let response = client
                .post(&endpoint)
                .json(&message)
                .send()
                .await
                .map_err(|err| DeliveryError::Unreachable(err.to_string()))?;

            match response.status() {
                status if status.is_success() => Ok(()),
                reqwest::StatusCode::NOT_FOUND | reqwest::StatusCode::GONE => {
                    Err(DeliveryError::Gone)
                }
                status => Err(DeliveryError::Rejected(format!("status {status}"))),
            }
        })
    }
}

/// Per-call delivery counts returned to the triggering component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of endpoints a send was attempted against.
    pub attempted: usize,
    /// Successful deliveries.
    pub sent: usize,
    /// Failed deliveries (logged, never retried here).
    pub failed: usize,
}

/// Deliver `message` to every endpoint registered by the audience.
///
/// Endpoints the gateway reports gone are pruned from the store so later
/// calls stop attempting them.
pub async fn notify(state: &SharedState, audience: Vec<Uuid>, message: PushMessage) -> DeliveryReport {
    if audience.is_empty() {
        return DeliveryReport::default();
    }

    let store = state.store();
    let subscriptions = match store.subscriptions_for(audience).await {
        Ok(subscriptions) => subscriptions,
        Err(err) => {
            warn!(error = %err, "failed to resolve push subscriptions");
            return DeliveryReport::default();
        }
    };

    let sender = state.push_sender();
    let sends = subscriptions
        .iter()
        .map(|subscription| sender.send(subscription.endpoint.clone(), message.clone()));
    let results = join_all(sends).await;

    let mut report = DeliveryReport {
        attempted: results.len(),
        ..DeliveryReport::default()
    };
    for (subscription, result) in subscriptions.iter().zip(results) {
        match result {
            Ok(()) => report.sent += 1,
            Err(DeliveryError::Gone) => {
                report.failed += 1;
                warn!(endpoint = %subscription.endpoint, "push endpoint gone; pruning subscription");
                if let Err(err) = store.remove_subscription(subscription.endpoint.clone()).await {
                    warn!(error = %err, "failed to prune dead subscription");
                }
            }
            Err(err) => {
                report.failed += 1;
                warn!(endpoint = %subscription.endpoint, error = %err, "push delivery failed");
            }
        }
    }

    report
}

/// Announce a finished game's results to the round's bettors.
///
/// Fire-and-forget: the dispatch runs on its own task and can never roll
/// back or delay the finalization that triggered it. Deduplicated per
/// round so a burst of finishing games notifies each participant once.
pub fn announce_results(state: &SharedState, game: &GameEntity) {
    let round_id = game.round_id;
    if !state.claim_results_notification(round_id, OffsetDateTime::now_utc()) {
        debug!(round = %round_id, "results already announced for this round; skipping");
        return;
    }

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let report = notify_round_results(&state, round_id).await;
        info!(
            round = %round_id,
            sent = report.sent,
            failed = report.failed,
            "results notification dispatched"
        );
    });
}

/// Resolve a round's bettors and deliver the results announcement.
pub async fn notify_round_results(state: &SharedState, round_id: Uuid) -> DeliveryReport {
    let audience = match state.store().bettors_of_round(round_id).await {
        Ok(audience) => audience,
        Err(err) => {
            warn!(round = %round_id, error = %err, "failed to resolve results audience");
            return DeliveryReport::default();
        }
    };

    notify(state, audience, results_available()).await
}

#[cfg(test)]
mod tests {
    use crate::{
        dao::{models::Role, pool_store::PoolStore},
        services::test_support,
    };

    use super::*;

    #[tokio::test]
    async fn partial_failure_is_reported_not_propagated() {
        let (state, sender) = test_support::test_state();
        sender.fail_endpoint("https://push.example/bad");

        let store = state.store();
        let ana = store.create_user("ana".into(), Role::Player).await.unwrap();
        let bob = store.create_user("bob".into(), Role::Player).await.unwrap();
        store
            .put_subscription(ana.id, "https://push.example/ok".into())
            .await
            .unwrap();
        store
            .put_subscription(bob.id, "https://push.example/bad".into())
            .await
            .unwrap();

        let report = notify(&state, vec![ana.id, bob.id], results_available()).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn gone_endpoint_is_pruned() {
        let (state, sender) = test_support::test_state();
        sender.mark_gone("https://push.example/stale");

        let store = state.store();
        let ana = store.create_user("ana".into(), Role::Player).await.unwrap();
        store
            .put_subscription(ana.id, "https://push.example/stale".into())
            .await
            .unwrap();

        let report = notify(&state, vec![ana.id], results_available()).await;
        assert_eq!(report.failed, 1);
        assert!(store.subscriptions_for(vec![ana.id]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_audience_sends_nothing() {
        let (state, sender) = test_support::test_state();
        let report = notify(&state, Vec::new(), results_available()).await;
        assert_eq!(report, DeliveryReport::default());
        assert!(sender.deliveries().is_empty());
    }

    #[tokio::test]
    async fn users_without_subscription_are_skipped_silently() {
        let (state, sender) = test_support::test_state();
        let store = state.store();
        let ana = store.create_user("ana".into(), Role::Player).await.unwrap();

        let report = notify(&state, vec![ana.id], results_available()).await;
        assert_eq!(report.attempted, 0);
        assert!(sender.deliveries().is_empty());
    }
}
