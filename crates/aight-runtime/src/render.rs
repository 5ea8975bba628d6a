//! Text and JSON rendering for command output.

use aight_core::autocomplete::render_highlight;
use aight_core::{MatchCandidate, Suggestion};
use serde_json::{Value, json};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// One aligned line per suggestion: id, label, state.
pub fn suggestion_lines(suggestions: &[Suggestion<'_>], color: bool) -> Vec<String> {
    let width = suggestions
        .iter()
        .map(|s| s.record.entity_id.len())
        .max()
        .unwrap_or(0);
    suggestions
        .iter()
        .map(|s| {
            let id = &s.record.entity_id;
            let pad = " ".repeat(width - id.len());
            let shown = if color {
                render_highlight(id, &s.highlight, BOLD, RESET)
            } else {
                id.clone()
            };
            let state = if color {
                format!("{DIM}[{}]{RESET}", s.record.state)
            } else {
                format!("[{}]", s.record.state)
            };
            format!("{shown}{pad}  {}  {state}", s.record.friendly_name)
        })
        .collect()
}

pub fn suggestions_json(input: &str, suggestions: &[Suggestion<'_>]) -> Value {
    let items: Vec<Value> = suggestions
        .iter()
        .map(|s| {
            json!({
                "entity_id": s.record.entity_id,
                "friendly_name": s.record.friendly_name,
                "state": s.record.state,
                "highlight": s.highlight.iter().map(|r| [r.start, r.end]).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "input": input, "suggestions": items })
}

/// `1. light.kitchen (Kitchen) score 5: location: "kitchen"; device type: "light"`
pub fn candidate_line(index: usize, candidate: &MatchCandidate) -> String {
    format!(
        "{}. {} ({}) score {}: {}",
        index + 1,
        candidate.entity_id(),
        candidate.record.friendly_name,
        candidate.score,
        candidate.reasons.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aight_core::{Confirmation, DeviceRecord, suggest};

    fn records() -> Vec<DeviceRecord> {
        vec![
            DeviceRecord::new("light.kitchen", "Kitchen", "on").unwrap(),
            DeviceRecord::new("light.kitchen_under_cabinet", "Under Cabinet", "off").unwrap(),
        ]
    }

    #[test]
    fn plain_lines_are_aligned() {
        let records = records();
        let lines = suggestion_lines(&suggest("light.kit", &records, 15), false);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("light.kitchen "));
        let label_col = "light.kitchen_under_cabinet".len() + 2;
        assert_eq!(lines[0].find("Kitchen"), Some(label_col));
        assert_eq!(lines[1].find("Under Cabinet"), Some(label_col));
        assert!(lines[1].ends_with("Under Cabinet  [off]"));
    }

    #[test]
    fn colored_lines_highlight_fragment() {
        let records = records();
        let lines = suggestion_lines(&suggest("light.kit", &records, 1), true);
        assert!(lines[0].starts_with("light.\x1b[1mkit\x1b[0mchen"));
    }

    #[test]
    fn json_shape() {
        let records = records();
        let v = suggestions_json("light.kit", &suggest("light.kit", &records, 15));
        assert_eq!(v["input"], "light.kit");
        assert_eq!(v["suggestions"][0]["entity_id"], "light.kitchen");
        assert_eq!(v["suggestions"][0]["highlight"][0], json!([6, 9]));
    }

    #[test]
    fn candidate_line_lists_reasons() {
        let candidate = MatchCandidate {
            record: DeviceRecord::new("light.kitchen", "Kitchen", "on").unwrap(),
            score: 5,
            reasons: vec!["location: \"kitchen\"".into(), "device type: \"light\"".into()],
            confirmed: Confirmation::Undecided,
        };
        assert_eq!(
            candidate_line(0, &candidate),
            "1. light.kitchen (Kitchen) score 5: location: \"kitchen\"; device type: \"light\""
        );
    }
}
