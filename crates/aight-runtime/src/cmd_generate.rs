//! `aight generate`: detect entities, confirm them, and ask the backend for
//! a configuration.

use std::collections::HashSet;
use std::io::Write;

use aight_client::{DiagnosticReport, GenerateRequest, GeneratedConfig};
use aight_core::types::domain_of;
use aight_core::{ConfigType, Confirmation, ConversationContext, detect_config_type, detect_entities};
use anyhow::Context;
use tokio::io::AsyncBufRead;

use crate::app::App;
use crate::cli::GenerateOpts;
use crate::input::{LineInput, parse_confirmation};
use crate::render::candidate_line;

pub async fn cmd_generate(app: &App, opts: GenerateOpts) -> anyhow::Result<()> {
    let assistant = app.connect().await?;
    let records = app.records_via(&assistant).await?;

    let config_type = opts
        .config_type
        .unwrap_or_else(|| detect_config_type(&opts.prompt));
    let mut ctx = ConversationContext::start(&opts.prompt, config_type, opts.entities.clone());

    if opts.entities.is_empty() {
        ctx.detected = detect_entities(&opts.prompt, &records);
        if ctx.detected.is_empty() {
            eprintln!("No matching devices detected; generating without entity hints.");
        } else if opts.yes {
            for i in 0..ctx.detected.len() {
                ctx.set_confirmation(i, Confirmation::Accepted);
            }
        } else {
            let mut input = LineInput::stdin();
            confirm_candidates(&mut ctx, &mut input, &mut std::io::stdout()).await?;
        }
    } else {
        let known: HashSet<&str> = records.iter().map(|r| r.entity_id.as_str()).collect();
        for id in opts.entities.iter().filter(|id| !known.contains(id.as_str())) {
            tracing::warn!(entity_id = %id, "entity not present in the snapshot");
        }
    }

    let request = GenerateRequest {
        prompt: opts.prompt.clone(),
        config_type,
        entities: ctx.confirmed_ids(),
    };
    let generated = match assistant.generate(&request).await {
        Ok(generated) => generated,
        Err(e) => {
            let domains = distinct_domains(&request.entities);
            let report = DiagnosticReport::new(&request, &domains, records.len()).with_error(&e);
            eprintln!("{report}");
            return Err(anyhow::Error::new(e).context("generation failed"));
        }
    };

    print_generated(&generated, config_type);
    if let Some(path) = &opts.out {
        std::fs::write(path, &generated.config)
            .with_context(|| format!("cannot write {}", path.display()))?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(())
}

/// Ask accept/reject/skip for each detected candidate.
///
/// Candidates left undecided are not sent. End of input leaves the
/// remaining candidates undecided.
pub async fn confirm_candidates<R, W>(
    ctx: &mut ConversationContext,
    input: &mut LineInput<R>,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Detected devices (y = include, n = exclude, enter = skip):")?;
    for i in 0..ctx.detected.len() {
        let line = candidate_line(i, &ctx.detected[i]);
        loop {
            write!(out, "{line} [y/n/s] ")?;
            out.flush()?;
            let Some(answer) = input.next_line().await? else {
                writeln!(out)?;
                return Ok(());
            };
            match parse_confirmation(&answer) {
                Some(decision) => {
                    ctx.set_confirmation(i, decision);
                    break;
                }
                None => writeln!(out, "Please answer y, n or s.")?,
            }
        }
    }
    Ok(())
}

/// Domains of `ids` in first-seen order.
pub fn distinct_domains(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|id| domain_of(id))
        .filter(|d| seen.insert(*d))
        .collect()
}

/// YAML to stdout; commentary to stderr so the output can be piped.
fn print_generated(generated: &GeneratedConfig, config_type: ConfigType) {
    eprintln!("Created {}:", config_type.noun_phrase());
    println!("{}", generated.config.trim_end());
    if !generated.explanation.is_empty() {
        eprintln!();
        eprintln!("{}", generated.explanation);
    }
    for warning in &generated.warnings {
        eprintln!("warning: {warning}");
    }
    if !generated.entities_used.is_empty() {
        eprintln!("entities used: {}", generated.entities_used.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aight_core::DeviceRecord;

    fn context_with(ids: &[&str]) -> ConversationContext {
        let records: Vec<DeviceRecord> = ids
            .iter()
            .map(|id| DeviceRecord::new(*id, "", "on").unwrap())
            .collect();
        let mut ctx = ConversationContext::start("kitchen lights", ConfigType::Automation, vec![]);
        ctx.detected = detect_entities("kitchen light", &records);
        ctx
    }

    #[tokio::test]
    async fn answers_map_to_decisions() {
        let mut ctx = context_with(&["light.kitchen_main", "light.kitchen_spot", "light.kitchen_strip"]);
        assert_eq!(ctx.detected.len(), 3);
        let mut input = LineInput::new(&b"y\nwhat\nn\n\n"[..]);
        let mut out = Vec::new();

        confirm_candidates(&mut ctx, &mut input, &mut out).await.unwrap();

        let decisions: Vec<Confirmation> = ctx.detected.iter().map(|c| c.confirmed).collect();
        assert_eq!(
            decisions,
            vec![Confirmation::Accepted, Confirmation::Rejected, Confirmation::Undecided]
        );
        assert_eq!(ctx.confirmed_ids(), vec![ctx.detected[0].entity_id().to_string()]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please answer y, n or s."));
    }

    #[tokio::test]
    async fn end_of_input_leaves_rest_undecided() {
        let mut ctx = context_with(&["light.kitchen_main", "light.kitchen_spot"]);
        let mut input = LineInput::new(&b"y\n"[..]);
        confirm_candidates(&mut ctx, &mut input, &mut Vec::new()).await.unwrap();
        assert_eq!(ctx.detected[0].confirmed, Confirmation::Accepted);
        assert_eq!(ctx.detected[1].confirmed, Confirmation::Undecided);
    }

    #[test]
    fn domains_are_deduplicated_in_order() {
        let ids = vec![
            "switch.a".to_string(),
            "light.b".to_string(),
            "switch.c".to_string(),
        ];
        assert_eq!(distinct_domains(&ids), vec!["switch", "light"]);
    }
}
