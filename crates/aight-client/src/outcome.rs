//! Typed results of the assistant services, decoded from response or event
//! payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedConfig {
    pub config: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub entities_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewReport {
    #[serde(default)]
    pub preview_html: String,
    #[serde(default)]
    pub entities_referenced: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed,
    /// The host could not deploy; the user has to install it by hand.
    Manual(&'static str),
}

/// Fail unless the payload reports `success: true`.
fn check_success(payload: &Value) -> Result<(), ClientError> {
    if payload.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    let message = payload
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("service reported failure without a message");
    Err(ClientError::Service(message.to_string()))
}

fn decode<T: for<'de> Deserialize<'de>>(what: &str, value: &Value) -> Result<T, ClientError> {
    serde_json::from_value(value.clone()).map_err(|e| ClientError::Decode(format!("{what}: {e}")))
}

pub fn decode_generated(payload: &Value) -> Result<GeneratedConfig, ClientError> {
    check_success(payload)?;
    let generated: GeneratedConfig = decode("generated config", payload)?;
    if generated.config.trim().is_empty() {
        return Err(ClientError::Service("backend returned an empty configuration".into()));
    }
    Ok(generated)
}

pub fn decode_validation(payload: &Value) -> Result<ValidationReport, ClientError> {
    check_success(payload)?;
    decode("validation report", payload)
}

pub fn decode_preview(payload: &Value) -> Result<PreviewReport, ClientError> {
    check_success(payload)?;
    let preview = payload
        .get("preview")
        .ok_or_else(|| ClientError::Decode("preview payload without `preview`".into()))?;
    decode("preview report", preview)
}

pub fn decode_deploy(payload: &Value) -> Result<DeployOutcome, ClientError> {
    check_success(payload)?;
    Ok(DeployOutcome::Deployed)
}

/// Reload acknowledgement; returns the host's message.
pub fn decode_reload(payload: &Value) -> Result<String, ClientError> {
    check_success(payload)?;
    Ok(payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("reloaded")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_config_decodes() {
        let payload = json!({
            "success": true,
            "config": "alias: Kitchen\n",
            "explanation": "Turns on the kitchen light",
            "entities_used": ["light.kitchen"],
        });
        let g = decode_generated(&payload).unwrap();
        assert_eq!(g.config, "alias: Kitchen\n");
        assert_eq!(g.entities_used, vec!["light.kitchen"]);
        assert!(g.warnings.is_empty());
    }

    #[test]
    fn failure_payload_carries_message() {
        let err = decode_generated(&json!({"success": false, "error": "LLM quota exceeded"})).unwrap_err();
        assert!(matches!(err, ClientError::Service(ref m) if m == "LLM quota exceeded"));
    }

    #[test]
    fn missing_success_is_a_failure() {
        assert!(matches!(
            decode_validation(&json!({"valid": true})),
            Err(ClientError::Service(_))
        ));
    }

    #[test]
    fn empty_config_is_rejected() {
        assert!(decode_generated(&json!({"success": true, "config": "  "})).is_err());
        assert!(matches!(
            decode_generated(&json!({"success": true})),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn preview_is_nested() {
        let payload = json!({
            "success": true,
            "preview": {
                "preview_html": "<div/>",
                "entities_referenced": ["light.a"],
                "warnings": ["Entity 'light.b' not found"],
                "errors": [],
            },
        });
        let p = decode_preview(&payload).unwrap();
        assert_eq!(p.entities_referenced, vec!["light.a"]);
        assert_eq!(p.warnings.len(), 1);
    }

    #[test]
    fn deploy_failure_is_an_error() {
        assert_eq!(decode_deploy(&json!({"success": true})).unwrap(), DeployOutcome::Deployed);
        assert!(matches!(
            decode_deploy(&json!({"success": false, "error": "read-only config"})),
            Err(ClientError::Service(ref m)) if m == "read-only config"
        ));
    }

    #[test]
    fn reload_message() {
        let msg = decode_reload(&json!({"success": true, "message": "Integration reloaded successfully"})).unwrap();
        assert_eq!(msg, "Integration reloaded successfully");
        assert!(decode_reload(&json!({"success": false, "error": "no entry"})).is_err());
    }
}
