//! Decoding host state snapshots into device records, and holding the
//! current snapshot.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::types::{AightError, DeviceRecord, split_entity_id};

impl DeviceRecord {
    /// Decode one host state object:
    /// `{"entity_id", "state", "attributes": {"friendly_name"}}`.
    ///
    /// Also accepts an already-serialized record (`friendly_name` at top level).
    pub fn from_state(value: &Value) -> Result<Self, AightError> {
        let entity_id = value
            .get("entity_id")
            .and_then(Value::as_str)
            .ok_or_else(|| AightError::InvalidSnapshot("state object without entity_id".into()))?;
        if split_entity_id(entity_id).is_none() {
            return Err(AightError::InvalidEntityId(entity_id.to_string()));
        }
        let friendly_name = value
            .pointer("/attributes/friendly_name")
            .or_else(|| value.get("friendly_name"))
            .and_then(Value::as_str)
            .unwrap_or(entity_id);
        let state = value.get("state").and_then(Value::as_str).unwrap_or("unknown");
        DeviceRecord::new(entity_id, friendly_name, state)
    }
}

/// Decode a snapshot array. Malformed entries and repeated ids are skipped
/// and counted; the first record for an id wins.
pub fn records_from_states(value: &Value) -> Result<(Vec<DeviceRecord>, usize), AightError> {
    let items = value
        .as_array()
        .ok_or_else(|| AightError::InvalidSnapshot("expected a JSON array of states".into()))?;
    let mut records = Vec::with_capacity(items.len());
    let mut seen = HashSet::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match DeviceRecord::from_state(item) {
            Ok(record) if seen.insert(record.entity_id.clone()) => records.push(record),
            Ok(_) | Err(_) => skipped += 1,
        }
    }
    Ok((records, skipped))
}

/// Parse snapshot JSON text (host states or serialized records).
pub fn parse_snapshot(json: &str) -> Result<(Vec<DeviceRecord>, usize), AightError> {
    let value: Value = serde_json::from_str(json)?;
    records_from_states(&value)
}

/// The current snapshot, swapped wholesale on reload.
///
/// Readers take an `Arc` and keep a consistent view even if a reload lands
/// while they are still scoring.
#[derive(Debug, Default)]
pub struct EntityCatalog {
    current: RwLock<Arc<[DeviceRecord]>>,
}

impl EntityCatalog {
    pub fn new(records: Vec<DeviceRecord>) -> Self {
        Self {
            current: RwLock::new(records.into()),
        }
    }

    pub fn snapshot(&self) -> Arc<[DeviceRecord]> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, records: Vec<DeviceRecord>) {
        let next: Arc<[DeviceRecord]> = records.into();
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
