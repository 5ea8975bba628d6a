//! Error types for the host connection and assistant services.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("websocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("connection closed")]
    Closed,

    #[error("no reply for {what} within {secs}s")]
    Timeout { what: String, secs: u64 },

    #[error("host rejected command ({code}): {message}")]
    Host { code: String, message: String },

    #[error("service failed: {0}")]
    Service(String),

    #[error("unexpected payload: {0}")]
    Decode(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Host error codes meaning the service does not exist on this host.
    pub fn is_service_missing(&self) -> bool {
        matches!(self, Self::Host { code, .. } if code == "not_found" || code == "service_not_found")
    }
}
