//! Plain-text report of a failed generation request.

use std::error::Error;
use std::fmt;

use aight_core::ConfigType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::services::GenerateRequest;

/// Entity ids listed in the report; the rest are counted.
pub const MAX_LISTED_IDS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub prompt: String,
    pub config_type: ConfigType,
    pub timestamp: DateTime<Utc>,
    pub domains: Vec<String>,
    pub total_entities: usize,
    pub sent_entities: usize,
    /// First [`MAX_LISTED_IDS`] entity ids sent.
    pub entity_ids: Vec<String>,
    /// Outbound service data.
    pub payload: Value,
    pub error_chain: Vec<String>,
}

impl DiagnosticReport {
    pub fn new(request: &GenerateRequest, domains: &[&str], total_entities: usize) -> Self {
        Self {
            prompt: request.prompt.clone(),
            config_type: request.config_type,
            timestamp: Utc::now(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            total_entities,
            sent_entities: request.entities.len(),
            entity_ids: request.entities.iter().take(MAX_LISTED_IDS).cloned().collect(),
            payload: serde_json::to_value(request).unwrap_or(Value::Null),
            error_chain: Vec::new(),
        }
    }

    /// Record an error and every `source()` beneath it.
    #[must_use]
    pub fn with_error(mut self, err: &(dyn Error + 'static)) -> Self {
        let mut current = Some(err);
        while let Some(e) = current {
            self.error_chain.push(e.to_string());
            current = e.source();
        }
        self
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- generation diagnostic ---")?;
        writeln!(f, "prompt:      {}", self.prompt)?;
        writeln!(f, "type:        {}", self.config_type)?;
        writeln!(f, "timestamp:   {}", self.timestamp.to_rfc3339())?;
        if self.domains.is_empty() {
            writeln!(f, "domains:     (none)")?;
        } else {
            writeln!(f, "domains:     {}", self.domains.join(", "))?;
        }
        writeln!(
            f,
            "entities:    {} of {} sent",
            self.sent_entities, self.total_entities
        )?;
        for id in &self.entity_ids {
            writeln!(f, "  - {id}")?;
        }
        let hidden = self.sent_entities.saturating_sub(self.entity_ids.len());
        if hidden > 0 {
            writeln!(f, "  ... and {hidden} more")?;
        }
        let payload = serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string());
        writeln!(f, "payload:")?;
        for line in payload.lines() {
            writeln!(f, "  {line}")?;
        }
        if let Some((first, causes)) = self.error_chain.split_first() {
            writeln!(f, "error:       {first}")?;
            for cause in causes {
                writeln!(f, "  caused by: {cause}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn request(n: usize) -> GenerateRequest {
        GenerateRequest {
            prompt: "lights on at sunset".into(),
            config_type: ConfigType::Automation,
            entities: (0..n).map(|i| format!("light.l{i}")).collect(),
        }
    }

    #[test]
    fn lists_first_ten_ids_and_counts_the_rest() {
        let report = DiagnosticReport::new(&request(13), &["light"], 40);
        assert_eq!(report.entity_ids.len(), MAX_LISTED_IDS);
        let text = report.to_string();
        assert!(text.contains("13 of 40 sent"));
        assert!(text.contains("light.l9"));
        assert!(!text.contains("  - light.l10"));
        assert!(text.contains("... and 3 more"));
        assert!(text.contains("\"type\": \"automation\""));
    }

    #[test]
    fn error_chain_includes_sources() {
        let tungstenite_err = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
        let err = ClientError::Connect {
            url: "ws://host".into(),
            source: tungstenite_err,
        };
        let report = DiagnosticReport::new(&request(1), &[], 1).with_error(&err);
        assert_eq!(report.error_chain.len(), 2);
        assert!(report.error_chain[0].starts_with("cannot connect to ws://host"));
        let text = report.to_string();
        assert!(text.contains("domains:     (none)"));
        assert!(text.contains("caused by:"));
    }
}
