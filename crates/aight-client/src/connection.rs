//! HostConnection trait: the seam between the assistant and the host.
//! Implemented by the websocket client and by in-process fakes in tests.

use std::future::Future;

use serde_json::Value;

use crate::error::ClientError;
use crate::subscription::EventSubscription;

pub trait HostConnection: Send + Sync {
    /// Call `domain.service` with `data`.
    ///
    /// Returns the service's response payload when `return_response` is set
    /// and the service produced one, `None` otherwise.
    fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: Value,
        return_response: bool,
    ) -> impl Future<Output = Result<Option<Value>, ClientError>> + Send;

    /// Subscribe to host events of `event_type`. The subscription is live
    /// once this resolves.
    fn subscribe(
        &self,
        event_type: &str,
    ) -> impl Future<Output = Result<EventSubscription, ClientError>> + Send;

    /// The host's full state list (raw `get_states` result).
    fn get_states(&self) -> impl Future<Output = Result<Value, ClientError>> + Send;
}
