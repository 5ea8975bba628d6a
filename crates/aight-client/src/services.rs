//! Names and request payloads of the assistant backend services.

use aight_core::ConfigType;
use serde::Serialize;

pub const DOMAIN: &str = "ai_config_assistant";

pub const SERVICE_GENERATE: &str = "generate_config";
pub const SERVICE_VALIDATE: &str = "validate_config";
pub const SERVICE_PREVIEW: &str = "preview_config";
pub const SERVICE_DEPLOY: &str = "deploy_config";
pub const SERVICE_RELOAD: &str = "reload";

pub const EVENT_GENERATED: &str = "ai_config_assistant_config_generated";
pub const EVENT_VALIDATED: &str = "ai_config_assistant_config_validated";
pub const EVENT_PREVIEWED: &str = "ai_config_assistant_config_previewed";
pub const EVENT_RELOADED: &str = "ai_config_assistant_reloaded";

pub const AUTOMATION_DOMAIN: &str = "automation";
pub const AUTOMATION_RELOAD: &str = "reload";

/// `generate_config` service data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(rename = "type")]
    pub config_type: ConfigType,
    pub entities: Vec<String>,
}

/// Service data for validate/preview/deploy: a YAML body and its type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigPayload {
    pub config: String,
    #[serde(rename = "type")]
    pub config_type: ConfigType,
}

/// Steps for installing a configuration by hand when the host cannot
/// deploy it.
pub fn manual_install_steps(config_type: ConfigType) -> &'static str {
    match config_type {
        ConfigType::Automation => {
            "To add this automation:\n\
             1. Go to Settings → Automations & Scenes\n\
             2. Click \"+ Create Automation\"\n\
             3. Click the three dots menu → \"Edit in YAML\"\n\
             4. Paste the configuration\n\
             5. Click Save"
        }
        ConfigType::Script => {
            "To add this script:\n\
             1. Go to Settings → Automations & Scenes → Scripts\n\
             2. Click \"+ Add Script\"\n\
             3. Click the three dots menu → \"Edit in YAML\"\n\
             4. Paste the configuration\n\
             5. Click Save"
        }
        ConfigType::Scene => {
            "To add this scene:\n\
             1. Go to Settings → Automations & Scenes → Scenes\n\
             2. Click \"+ Add Scene\"\n\
             3. Click the three dots menu → \"Edit in YAML\"\n\
             4. Paste the configuration\n\
             5. Click Save"
        }
        ConfigType::Lovelace => {
            "To add this card:\n\
             1. Edit your dashboard\n\
             2. Click \"+ Add Card\"\n\
             3. Search for \"Manual\"\n\
             4. Paste the configuration\n\
             5. Click Save"
        }
        ConfigType::Sensor | ConfigType::Template => {
            "To add this sensor:\n\
             1. Add to your configuration.yaml under \"template:\"\n\
             2. Restart Home Assistant"
        }
    }
}
