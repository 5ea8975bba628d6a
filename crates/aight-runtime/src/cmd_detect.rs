//! `aight detect` and `aight entities`: inspect what a prompt selects.

use aight_core::{DeviceRecord, MatchCandidate, detect_entities, detect_relevant_domains, relevant_entities};
use serde_json::{Value, json};

use crate::app::App;
use crate::cli::PromptOpts;
use crate::render::candidate_line;

pub async fn cmd_detect(app: &App, opts: PromptOpts) -> anyhow::Result<()> {
    let records = app.load_records().await?;
    let candidates = detect_entities(&opts.prompt, &records);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&candidates_json(&candidates))?);
        return Ok(());
    }
    if candidates.is_empty() {
        println!("No devices match \"{}\".", opts.prompt);
    }
    for (i, candidate) in candidates.iter().enumerate() {
        println!("{}", candidate_line(i, candidate));
    }
    Ok(())
}

pub async fn cmd_entities(app: &App, opts: PromptOpts) -> anyhow::Result<()> {
    let records = app.load_records().await?;
    let domains = detect_relevant_domains(&opts.prompt);
    let selected = relevant_entities(&opts.prompt, &domains, &records);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&selection_json(&domains, &selected))?);
        return Ok(());
    }
    println!("domains: {}", domains.join(", "));
    println!("{} of {} entities selected", selected.len(), records.len());
    for record in selected {
        println!("  {}", record.entity_id);
    }
    Ok(())
}

fn candidates_json(candidates: &[MatchCandidate]) -> Value {
    Value::Array(
        candidates
            .iter()
            .map(|c| {
                json!({
                    "entity_id": c.entity_id(),
                    "friendly_name": c.record.friendly_name,
                    "score": c.score,
                    "reasons": c.reasons,
                })
            })
            .collect(),
    )
}

fn selection_json(domains: &[&str], selected: &[&DeviceRecord]) -> Value {
    json!({
        "domains": domains,
        "entities": selected.iter().map(|r| r.entity_id.as_str()).collect::<Vec<_>>(),
    })
}
