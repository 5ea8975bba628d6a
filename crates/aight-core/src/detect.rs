//! Prompt-wide entity detection.
//!
//! Scores every record against a natural-language prompt using location and
//! device vocabularies plus raw word overlap, then keeps the best few.

use crate::keywords::{
    DETECT_DEVICES, DETECT_LOCATIONS, DETECT_MAX_CANDIDATES, DETECT_MIN_SCORE, DeviceKeyword,
    WEIGHT_DEVICE_DOMAIN, WEIGHT_DEVICE_NAME, WEIGHT_LOCATION, WEIGHT_WORD_OVERLAP,
    WORD_OVERLAP_MIN_LEN,
};
use crate::types::{Confirmation, DeviceRecord, MatchCandidate};

/// Vocabulary hits for one prompt, computed once and reused per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSignals<'p> {
    pub locations: Vec<&'static str>,
    pub devices: Vec<&'static DeviceKeyword>,
    /// Lower-cased words longer than the overlap minimum, in prompt order.
    pub words: Vec<&'p str>,
}

/// Extract vocabulary hits from an already lower-cased prompt.
pub fn prompt_signals(prompt_lower: &str) -> PromptSignals<'_> {
    PromptSignals {
        locations: DETECT_LOCATIONS
            .iter()
            .copied()
            .filter(|loc| prompt_lower.contains(loc))
            .collect(),
        devices: DETECT_DEVICES
            .iter()
            .filter(|dev| prompt_lower.contains(dev.keyword))
            .collect(),
        words: prompt_lower
            .split_whitespace()
            .filter(|w| w.chars().count() > WORD_OVERLAP_MIN_LEN)
            .collect(),
    }
}

/// Score one record. Returns the total and one reason per contribution.
pub fn score_record(record: &DeviceRecord, signals: &PromptSignals<'_>) -> (u32, Vec<String>) {
    let id = record.entity_id.to_lowercase();
    let name = record.friendly_name.to_lowercase();
    let domain = record.domain().to_lowercase();

    let mut score = 0;
    let mut reasons = Vec::new();

    for location in &signals.locations {
        if id.contains(location) || name.contains(location) {
            score += WEIGHT_LOCATION;
            reasons.push(format!("location: \"{location}\""));
        }
    }

    for device in &signals.devices {
        if device.domains.contains(&domain.as_str()) {
            score += WEIGHT_DEVICE_DOMAIN;
            reasons.push(format!("device type: \"{}\"", device.keyword));
        }
        if name.contains(device.keyword) {
            score += WEIGHT_DEVICE_NAME;
            reasons.push(format!("name contains: \"{}\"", device.keyword));
        }
    }

    for word in &signals.words {
        if id.contains(word) || name.contains(word) {
            score += WEIGHT_WORD_OVERLAP;
            reasons.push(format!("name match: \"{word}\""));
        }
    }

    (score, reasons)
}

/// Detect the records a prompt most likely refers to.
///
/// Keeps records scoring at least 2, ordered by descending score (ties keep
/// snapshot order), at most 8.
pub fn detect_entities(prompt: &str, records: &[DeviceRecord]) -> Vec<MatchCandidate> {
    if records.is_empty() {
        return Vec::new();
    }
    let prompt_lower = prompt.to_lowercase();
    let signals = prompt_signals(&prompt_lower);

    let mut candidates: Vec<MatchCandidate> = records
        .iter()
        .filter_map(|record| {
            let (score, reasons) = score_record(record, &signals);
            (score >= DETECT_MIN_SCORE).then(|| MatchCandidate {
                record: record.clone(),
                score,
                reasons,
                confirmed: Confirmation::Undecided,
            })
        })
        .collect();

    // sort_by is stable
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(DETECT_MAX_CANDIDATES);
    candidates
}

// ─── Tests ──────────────────────────────────────────────────────
