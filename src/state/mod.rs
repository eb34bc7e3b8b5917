use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    config::AppConfig, dao::pool_store::PoolStore, services::notification_service::PushSender,
};

/// Cheaply cloneable handle on the shared application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the store handle, configuration, and
/// the push delivery gateway.
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn PoolStore>,
    push: Arc<dyn PushSender>,
    /// Rounds whose "results available" notification went out recently,
    /// keyed by round id. Consulted before announcing results so several
    /// games of one round finishing close together notify once.
    results_notified: DashMap<Uuid, OffsetDateTime>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn PoolStore>,
        push: Arc<dyn PushSender>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            store,
            push,
            results_notified: DashMap::new(),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the lifecycle store.
    pub fn store(&self) -> Arc<dyn PoolStore> {
        Arc::clone(&self.store)
    }

    /// Handle to the push delivery gateway.
    pub fn push_sender(&self) -> Arc<dyn PushSender> {
        Arc::clone(&self.push)
    }

    /// Claim the right to announce a round's results.
    ///
    /// Returns `true` at most once per dedupe window per round; the caller
    /// that wins sends the notification, everyone else skips it.
    pub fn claim_results_notification(&self, round_id: Uuid, now: OffsetDateTime) -> bool {
        let window = self.config.results_dedupe_window;
        match self.results_notified.entry(round_id) {
            Entry::Occupied(mut entry) => {
                if now - *entry.get() < window {
                    return false;
                }
                entry.insert(now);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }
}
