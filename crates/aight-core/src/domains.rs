//! Chat-mode entity selection.
//!
//! Coarser than prompt detection: decide which domains a message is about,
//! narrow the snapshot to those domains, and prefer records in any room the
//! message names.

use crate::keywords::{CHAT_DEFAULT_DOMAINS, CHAT_KEYWORD_DOMAINS, CHAT_LOCATIONS, CHAT_MAX_ENTITIES};
use crate::types::DeviceRecord;

/// Domains plausibly referenced by `prompt`, in first-seen table order.
///
/// Falls back to a default household set when nothing matches.
pub fn detect_relevant_domains(prompt: &str) -> Vec<&'static str> {
    let lower = prompt.to_lowercase();
    let mut domains: Vec<&'static str> = Vec::new();

    for (keyword, list) in CHAT_KEYWORD_DOMAINS {
        if lower.contains(keyword) {
            for &domain in list.iter() {
                if !domains.contains(&domain) {
                    domains.push(domain);
                }
            }
        }
    }

    if domains.is_empty() {
        domains.extend_from_slice(CHAT_DEFAULT_DOMAINS);
    }
    domains
}

/// Location keywords found in an already lower-cased prompt, each in its
/// spaced, underscored and concatenated spellings (duplicates removed).
pub fn extract_location_keywords(prompt_lower: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for location in CHAT_LOCATIONS {
        if !prompt_lower.contains(location) {
            continue;
        }
        let variants = [
            location.to_string(),
            location.split_whitespace().collect::<Vec<_>>().join("_"),
            location.split_whitespace().collect::<String>(),
        ];
        for variant in variants {
            if !found.contains(&variant) {
                found.push(variant);
            }
        }
    }
    found
}

/// Records in `domains`, narrowed to named locations when that leaves
/// anything, capped at 100.
pub fn relevant_entities<'a>(
    prompt: &str,
    domains: &[&str],
    records: &'a [DeviceRecord],
) -> Vec<&'a DeviceRecord> {
    let lower = prompt.to_lowercase();
    let locations = extract_location_keywords(&lower);

    let mut selected: Vec<&DeviceRecord> = records
        .iter()
        .filter(|r| domains.contains(&r.domain()))
        .collect();

    if !locations.is_empty() {
        let located: Vec<&DeviceRecord> = selected
            .iter()
            .copied()
            .filter(|r| {
                let id = r.entity_id.to_lowercase();
                let name = r.friendly_name.to_lowercase();
                locations
                    .iter()
                    .any(|loc| id.contains(loc.as_str()) || name.contains(loc.as_str()))
            })
            .collect();
        if !located.is_empty() {
            selected = located;
        }
    }

    selected.truncate(CHAT_MAX_ENTITIES);
    selected
}
