//! Assistant service calls over a host connection.

use std::time::Duration;

use aight_core::{ConfigType, DeviceRecord, records_from_states};
use serde_json::{Value, json};

use crate::connection::HostConnection;
use crate::error::ClientError;
use crate::outcome::{
    DeployOutcome, GeneratedConfig, PreviewReport, ValidationReport, decode_deploy, decode_generated,
    decode_preview, decode_reload, decode_validation,
};
use crate::services::{self, ConfigPayload, GenerateRequest};

pub struct ConfigAssistant<C> {
    host: C,
    reply_timeout: Duration,
}

impl<C: HostConnection> ConfigAssistant<C> {
    pub fn new(host: C, reply_timeout: Duration) -> Self {
        Self { host, reply_timeout }
    }

    pub fn host(&self) -> &C {
        &self.host
    }

    /// Subscribe to the completion event, then call the service.
    ///
    /// A direct response wins; otherwise the first event payload is taken.
    /// The subscription is released when this returns, whatever the outcome.
    async fn call_and_wait(
        &self,
        service: &str,
        data: Value,
        event_type: &str,
        return_response: bool,
    ) -> Result<Value, ClientError> {
        let mut subscription = self.host.subscribe(event_type).await?;
        let response = self
            .host
            .call_service(services::DOMAIN, service, data, return_response)
            .await?;
        if let Some(response) = response {
            tracing::debug!(service, "direct service response");
            return Ok(response);
        }
        tracing::debug!(service, event_type, "waiting for completion event");
        subscription.next_event(self.reply_timeout).await
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedConfig, ClientError> {
        tracing::info!(
            config_type = %request.config_type,
            entities = request.entities.len(),
            "generating configuration"
        );
        let data = serde_json::to_value(request)?;
        let payload = self
            .call_and_wait(services::SERVICE_GENERATE, data, services::EVENT_GENERATED, true)
            .await?;
        decode_generated(&payload)
    }

    pub async fn validate(&self, config: &str, config_type: ConfigType) -> Result<ValidationReport, ClientError> {
        let data = serde_json::to_value(ConfigPayload {
            config: config.to_string(),
            config_type,
        })?;
        let payload = self
            .call_and_wait(services::SERVICE_VALIDATE, data, services::EVENT_VALIDATED, false)
            .await?;
        decode_validation(&payload)
    }

    pub async fn preview(&self, config: &str, config_type: ConfigType) -> Result<PreviewReport, ClientError> {
        let data = serde_json::to_value(ConfigPayload {
            config: config.to_string(),
            config_type,
        })?;
        let payload = self
            .call_and_wait(services::SERVICE_PREVIEW, data, services::EVENT_PREVIEWED, false)
            .await?;
        decode_preview(&payload)
    }

    /// Deploy a configuration. Hosts without a deploy response (or without
    /// the service at all) get manual install steps instead.
    pub async fn deploy(&self, config: &str, config_type: ConfigType) -> Result<DeployOutcome, ClientError> {
        let data = serde_json::to_value(ConfigPayload {
            config: config.to_string(),
            config_type,
        })?;
        let manual = DeployOutcome::Manual(services::manual_install_steps(config_type));
        match self
            .host
            .call_service(services::DOMAIN, services::SERVICE_DEPLOY, data, true)
            .await
        {
            Ok(Some(response)) => decode_deploy(&response),
            Ok(None) => Ok(manual),
            Err(e) if e.is_service_missing() => {
                tracing::warn!("deploy service unavailable on host: {e}");
                Ok(manual)
            }
            Err(e) => Err(e),
        }
    }

    /// Reload the assistant integration on the host.
    pub async fn reload_integration(&self) -> Result<String, ClientError> {
        let payload = self
            .call_and_wait(services::SERVICE_RELOAD, json!({}), services::EVENT_RELOADED, false)
            .await?;
        decode_reload(&payload)
    }

    pub async fn reload_automations(&self) -> Result<(), ClientError> {
        self.host
            .call_service(services::AUTOMATION_DOMAIN, services::AUTOMATION_RELOAD, json!({}), false)
            .await
            .map(|_| ())
    }

    /// Fetch and decode the host's current state list.
    /// Returns the records and how many entries were skipped.
    pub async fn fetch_snapshot(&self) -> Result<(Vec<DeviceRecord>, usize), ClientError> {
        let states = self.host.get_states().await?;
        let (records, skipped) =
            records_from_states(&states).map_err(|e| ClientError::Decode(e.to_string()))?;
        if skipped > 0 {
            tracing::warn!(skipped, "skipped malformed host states");
        }
        tracing::debug!(records = records.len(), "snapshot fetched");
        Ok((records, skipped))
    }
}
