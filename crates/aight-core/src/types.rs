use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Errors ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum AightError {
    #[error("invalid entity id {0:?}: expected domain.object_id")]
    InvalidEntityId(String),

    #[error("invalid state snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("unknown config type: {0}")]
    UnknownConfigType(String),

    #[error("snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),
}

// ─── Entity ids ───────────────────────────────────────────────────

/// Split `domain.object_id` at the first dot.
///
/// Returns `None` unless both halves are non-empty.
pub fn split_entity_id(entity_id: &str) -> Option<(&str, &str)> {
    let (domain, object_id) = entity_id.split_once('.')?;
    if domain.is_empty() || object_id.is_empty() {
        return None;
    }
    Some((domain, object_id))
}

/// Domain segment of an id, or the whole id when it has no dot.
pub fn domain_of(entity_id: &str) -> &str {
    entity_id.split('.').next().unwrap_or(entity_id)
}

// ─── Device records ───────────────────────────────────────────────

/// One entity as seen in a host state snapshot.
///
/// Records are immutable once loaded; matchers only borrow them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub entity_id: String,
    pub friendly_name: String,
    pub state: String,
}

impl DeviceRecord {
    /// Build a record, validating the id shape. An empty label falls back
    /// to the id.
    pub fn new(
        entity_id: impl Into<String>,
        friendly_name: impl Into<String>,
        state: impl Into<String>,
    ) -> Result<Self, AightError> {
        let entity_id = entity_id.into();
        if split_entity_id(&entity_id).is_none() {
            return Err(AightError::InvalidEntityId(entity_id));
        }
        let mut friendly_name = friendly_name.into();
        if friendly_name.is_empty() {
            friendly_name = entity_id.clone();
        }
        Ok(Self {
            entity_id,
            friendly_name,
            state: state.into(),
        })
    }

    pub fn domain(&self) -> &str {
        domain_of(&self.entity_id)
    }

    pub fn object_id(&self) -> &str {
        split_entity_id(&self.entity_id)
            .map(|(_, object_id)| object_id)
            .unwrap_or("")
    }
}

// ─── Candidates ───────────────────────────────────────────────────

/// User decision on a detected candidate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    #[default]
    Undecided,
    Accepted,
    Rejected,
}

/// A record scored against a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    pub record: DeviceRecord,
    pub score: u32,
    /// One entry per score contribution, in the order they were added.
    pub reasons: Vec<String>,
    pub confirmed: Confirmation,
}

impl MatchCandidate {
    pub fn entity_id(&self) -> &str {
        &self.record.entity_id
    }

    pub fn is_accepted(&self) -> bool {
        self.confirmed == Confirmation::Accepted
    }
}

// ─── Config types ─────────────────────────────────────────────────

/// Kind of configuration the backend is asked to produce.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    #[default]
    Automation,
    Script,
    Scene,
    Lovelace,
    Sensor,
    Template,
}

impl ConfigType {
    pub const ALL: [Self; 6] = [
        Self::Automation,
        Self::Script,
        Self::Scene,
        Self::Lovelace,
        Self::Sensor,
        Self::Template,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automation => "automation",
            Self::Script => "script",
            Self::Scene => "scene",
            Self::Lovelace => "lovelace",
            Self::Sensor => "sensor",
            Self::Template => "template",
        }
    }

    /// Phrase used when telling the user what was produced.
    pub fn noun_phrase(self) -> &'static str {
        match self {
            Self::Automation => "an automation",
            Self::Script => "a script",
            Self::Scene => "a scene",
            Self::Lovelace => "a dashboard card",
            Self::Sensor => "a sensor",
            Self::Template => "a template",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigType {
    type Err = AightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automation" => Ok(Self::Automation),
            "script" => Ok(Self::Script),
            "scene" => Ok(Self::Scene),
            "lovelace" | "dashboard" | "card" => Ok(Self::Lovelace),
            "sensor" | "binary_sensor" => Ok(Self::Sensor),
            "template" => Ok(Self::Template),
            _ => Err(AightError::UnknownConfigType(s.to_string())),
        }
    }
}
