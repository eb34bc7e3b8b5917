//! Shared fixtures for service-level tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;

use crate::{
    config::AppConfig,
    dao::memory::MemoryStore,
    services::notification_service::{DeliveryError, PushMessage, PushSender},
    state::{AppState, SharedState},
};

/// [`PushSender`] that records every delivery attempt instead of talking
/// to the network. Endpoints can be marked as failing or gone.
pub(crate) struct RecordingSender {
    deliveries: Arc<Mutex<Vec<(String, String)>>>,
    failing: Mutex<HashSet<String>>,
    gone: Mutex<HashSet<String>>,
}

impl RecordingSender {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            deliveries: Arc::default(),
            failing: Mutex::default(),
            gone: Mutex::default(),
        })
    }

    /// Make deliveries to `endpoint` fail as unreachable.
    pub(crate) fn fail_endpoint(&self, endpoint: &str) {
        self.failing.lock().unwrap().insert(endpoint.to_owned());
    }

    /// Make deliveries to `endpoint` report the subscription gone.
    pub(crate) fn mark_gone(&self, endpoint: &str) {
        self.gone.lock().unwrap().insert(endpoint.to_owned());
    }

    /// Every `(endpoint, title)` pair attempted so far.
    pub(crate) fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl PushSender for RecordingSender {
    fn send(
        &self,
        endpoint: String,
        message: PushMessage,
    ) -> BoxFuture<'static, Result<(), DeliveryError>> {
        let deliveries = Arc::clone(&self.deliveries);
        let outcome = if self.gone.lock().unwrap().contains(&endpoint) {
            Err(DeliveryError::Gone)
        } else if self.failing.lock().unwrap().contains(&endpoint) {
            Err(DeliveryError::Unreachable("connection refused".into()))
        } else {
            Ok(())
        };

        Box::pin(async move {
            deliveries.lock().unwrap().push((endpoint, message.title));
            outcome
        })
    }
}

/// Fresh state over an empty in-memory store with default windows.
pub(crate) fn test_state() -> (SharedState, Arc<RecordingSender>) {
    let config = AppConfig::default();
    let store = MemoryStore::new(config.lock_window, config.reminder_lead);
    let sender = RecordingSender::new();
    let state = AppState::new(config, Arc::new(store), sender.clone());
    (state, sender)
}
