//! Conversation state carried between chat turns.

use serde::Serialize;

use crate::types::{ConfigType, Confirmation, MatchCandidate};

/// What the chat remembers about the current request.
///
/// Replaced wholesale when a new (non-refinement) request starts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationContext {
    pub original_prompt: String,
    pub config_type: ConfigType,
    /// Entity ids selected for the request before any confirmation.
    pub relevant_entities: Vec<String>,
    /// Detection results awaiting accept/reject.
    pub detected: Vec<MatchCandidate>,
    pub last_config: Option<String>,
    pub last_config_type: Option<ConfigType>,
    /// Entity ids the last successful generation used.
    pub confirmed_entities: Vec<String>,
}

impl ConversationContext {
    pub fn start(prompt: &str, config_type: ConfigType, relevant_entities: Vec<String>) -> Self {
        Self {
            original_prompt: prompt.to_string(),
            config_type,
            relevant_entities,
            ..Self::default()
        }
    }

    pub fn has_config(&self) -> bool {
        self.last_config.is_some()
    }

    /// Set the decision for detected candidate `index`. Returns false when
    /// the index is out of range.
    pub fn set_confirmation(&mut self, index: usize, decision: Confirmation) -> bool {
        match self.detected.get_mut(index) {
            Some(candidate) => {
                candidate.confirmed = decision;
                true
            }
            None => false,
        }
    }

    /// Ids to send with the next generation request: accepted candidates
    /// when detection ran, otherwise the relevant entity selection.
    pub fn confirmed_ids(&self) -> Vec<String> {
        if self.detected.is_empty() {
            return self.relevant_entities.clone();
        }
        self.detected
            .iter()
            .filter(|c| c.is_accepted())
            .map(|c| c.entity_id().to_string())
            .collect()
    }

    /// Prompt for a refinement turn: the running prompt plus the new request.
    pub fn refined_prompt(&self, request: &str) -> String {
        format!("{}. {}", self.original_prompt, request)
    }

    pub fn record_generated(&mut self, config: String, config_type: ConfigType, entities: Vec<String>) {
        self.last_config = Some(config);
        self.last_config_type = Some(config_type);
        self.confirmed_entities = entities;
    }

    /// A refinement succeeded; the refined prompt becomes the base for the next one.
    pub fn record_refined(&mut self, refined_prompt: String, config: String) {
        self.original_prompt = refined_prompt;
        self.last_config = Some(config);
    }

    /// Config type to use for a refinement turn.
    pub fn refinement_type(&self) -> ConfigType {
        self.last_config_type.unwrap_or(self.config_type)
    }
}
