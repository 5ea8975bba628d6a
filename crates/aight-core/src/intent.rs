//! Cheap intent heuristics for chat messages.

use crate::keywords::REFINEMENT_KEYWORDS;
use crate::types::ConfigType;

/// Guess which kind of configuration a message asks for.
///
/// Checked in priority order; anything unrecognised is an automation.
pub fn detect_config_type(prompt: &str) -> ConfigType {
    let lower = prompt.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["automation", "when", "trigger", "alert", "notify", "if"]) {
        ConfigType::Automation
    } else if has(&["scene"]) {
        ConfigType::Scene
    } else if has(&["script", "sequence"]) {
        ConfigType::Script
    } else if has(&["dashboard", "card", "lovelace"]) {
        ConfigType::Lovelace
    } else if has(&["sensor", "template"]) {
        ConfigType::Sensor
    } else {
        ConfigType::Automation
    }
}

/// Whether a message tweaks the previous configuration rather than starting
/// a new one. Never true without a previous configuration.
pub fn is_refinement_request(message: &str, has_previous_config: bool) -> bool {
    if !has_previous_config {
        return false;
    }
    let lower = message.to_lowercase();
    REFINEMENT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// The bare `reload` chat command.
pub fn is_reload_command(message: &str) -> bool {
    message.trim().eq_ignore_ascii_case("reload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automation_words_win() {
        assert_eq!(detect_config_type("When motion is detected"), ConfigType::Automation);
        // "if" outranks "scene"
        assert_eq!(detect_config_type("set a scene if dark"), ConfigType::Automation);
    }

    #[test]
    fn other_types() {
        assert_eq!(detect_config_type("movie scene"), ConfigType::Scene);
        assert_eq!(detect_config_type("a script to close blinds"), ConfigType::Script);
        assert_eq!(detect_config_type("dashboard for energy"), ConfigType::Lovelace);
        assert_eq!(detect_config_type("template for power"), ConfigType::Sensor);
    }

    #[test]
    fn default_is_automation() {
        assert_eq!(detect_config_type("blinds at dusk"), ConfigType::Automation);
    }

    #[test]
    fn refinement_needs_previous_config() {
        assert!(!is_refinement_request("also turn on the tv", false));
        assert!(is_refinement_request("Also turn on the TV", true));
        assert!(!is_refinement_request("turn on the tv", true));
    }

    #[test]
    fn reload_command_is_exact() {
        assert!(is_reload_command("  Reload "));
        assert!(!is_reload_command("reload automations"));
    }
}
