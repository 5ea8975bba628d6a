//! Event subscription guard.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ClientError;

type Release = Box<dyn FnOnce(u64) + Send>;

/// Live server-side subscription to one event type.
///
/// Yields each event's `data` payload. Dropping the guard releases the
/// subscription on the host, so a caller that gives up (timeout, error, or
/// early return) never leaves a listener behind.
pub struct EventSubscription {
    id: u64,
    event_type: String,
    events: mpsc::UnboundedReceiver<Value>,
    release: Option<Release>,
}

impl EventSubscription {
    pub fn new(
        id: u64,
        event_type: impl Into<String>,
        events: mpsc::UnboundedReceiver<Value>,
        release: impl FnOnce(u64) + Send + 'static,
    ) -> Self {
        Self {
            id,
            event_type: event_type.into(),
            events,
            release: Some(Box::new(release)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Wait up to `wait` for the next event payload.
    pub async fn next_event(&mut self, wait: Duration) -> Result<Value, ClientError> {
        match tokio::time::timeout(wait, self.events.recv()).await {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(ClientError::Closed),
            Err(_) => Err(ClientError::Timeout {
                what: self.event_type.clone(),
                secs: wait.as_secs(),
            }),
        }
    }
}

impl fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.id);
        }
    }
}
