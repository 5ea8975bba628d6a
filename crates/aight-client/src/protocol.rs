//! Frames of the host platform's websocket API.
//!
//! ```text
//! server: {"type":"auth_required"}
//! client: {"type":"auth","access_token":"..."}
//! server: {"type":"auth_ok"} | {"type":"auth_invalid","message":"..."}
//! client: {"id":1,"type":"call_service","domain":"d","service":"s","service_data":{..}}
//! server: {"id":1,"type":"result","success":true,"result":{..}}
//! server: {"id":2,"type":"event","event":{"event_type":"..","data":{..}}}
//! ```

use serde::Deserialize;
use serde_json::{Value, json};

/// A frame received from the host.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Incoming {
    AuthRequired,
    AuthOk,
    AuthInvalid {
        #[serde(default)]
        message: Option<String>,
    },
    Result {
        id: u64,
        success: bool,
        #[serde(default)]
        result: Value,
        #[serde(default)]
        error: Option<HostError>,
    },
    Event {
        id: u64,
        event: EventFrame,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventFrame {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

pub fn parse_incoming(text: &str) -> Result<Incoming, serde_json::Error> {
    serde_json::from_str(text)
}

// ─── Outgoing frames (id is attached by the IO task) ─────────────

pub fn auth(token: &str) -> Value {
    json!({ "type": "auth", "access_token": token })
}

pub fn call_service(domain: &str, service: &str, data: Value, return_response: bool) -> Value {
    let mut msg = json!({
        "type": "call_service",
        "domain": domain,
        "service": service,
        "service_data": data,
    });
    if return_response {
        msg["return_response"] = Value::Bool(true);
    }
    msg
}

pub fn subscribe_events(event_type: &str) -> Value {
    json!({ "type": "subscribe_events", "event_type": event_type })
}

pub fn unsubscribe_events(subscription: u64) -> Value {
    json!({ "type": "unsubscribe_events", "subscription": subscription })
}

pub fn get_states() -> Value {
    json!({ "type": "get_states" })
}

/// Attach a command id to an outgoing frame.
pub fn with_id(mut msg: Value, id: u64) -> Value {
    if let Value::Object(map) = &mut msg {
        map.insert("id".into(), Value::from(id));
    }
    msg
}
