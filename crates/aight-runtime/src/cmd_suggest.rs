//! `aight suggest`: autocomplete for the token being typed.

use std::sync::Arc;

use aight_client::Debouncer;
use aight_core::keywords::AUTOCOMPLETE_MAX_SUGGESTIONS;
use aight_core::{DeviceRecord, apply_suggestion, suggest};

use crate::app::{App, use_color};
use crate::cli::SuggestOpts;
use crate::input::LineInput;
use crate::render::{suggestion_lines, suggestions_json};

pub async fn cmd_suggest(app: &App, opts: SuggestOpts) -> anyhow::Result<()> {
    let limit = resolve_limit(opts.limit, app.config.autocomplete.limit)?;
    let records = app.load_records().await?;

    if opts.stream {
        let debouncer = Debouncer::new(app.config.debounce());
        let mut input = LineInput::stdin();
        return stream(&debouncer, Arc::from(records), limit, &mut input).await;
    }

    let input = opts.input.unwrap_or_default();
    let suggestions = suggest(&input, &records, limit);

    if let Some(n) = opts.accept {
        let Some(chosen) = n.checked_sub(1).and_then(|i| suggestions.get(i)) else {
            anyhow::bail!("--accept {n}: only {} suggestions", suggestions.len());
        };
        println!("{}", apply_suggestion(&input, &chosen.record.entity_id));
        return Ok(());
    }

    if opts.json {
        println!("{}", suggestions_json(&input, &suggestions));
    } else {
        for line in suggestion_lines(&suggestions, use_color()) {
            println!("{line}");
        }
    }
    Ok(())
}

fn resolve_limit(requested: Option<usize>, configured: usize) -> anyhow::Result<usize> {
    let limit = requested.unwrap_or(configured);
    if !(1..=AUTOCOMPLETE_MAX_SUGGESTIONS).contains(&limit) {
        anyhow::bail!("limit must be between 1 and {AUTOCOMPLETE_MAX_SUGGESTIONS}, got {limit}");
    }
    Ok(limit)
}

/// One JSON line per settled input revision. Revisions arriving inside the
/// debounce window replace the pending one.
async fn stream<R>(
    debouncer: &Debouncer,
    records: Arc<[DeviceRecord]>,
    limit: usize,
    input: &mut LineInput<R>,
) -> anyhow::Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut last = None;
    while let Some(line) = input.next_line().await? {
        let records = Arc::clone(&records);
        last = Some(debouncer.call(
            move || suggestions_json(&line, &suggest(&line, &records, limit)).to_string(),
            |json| println!("{json}"),
        ));
    }
    if let Some(handle) = last {
        handle.await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_config_and_is_bounded() {
        assert_eq!(resolve_limit(None, 10).unwrap(), 10);
        assert_eq!(resolve_limit(Some(3), 10).unwrap(), 3);
        assert!(resolve_limit(Some(0), 10).is_err());
        assert!(resolve_limit(Some(16), 10).is_err());
    }
}
