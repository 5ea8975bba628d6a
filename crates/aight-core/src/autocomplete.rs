//! Entity-id autocomplete for free-text prompts.
//!
//! Only the token under the cursor (the last whitespace-separated token) is
//! considered, and only once it looks like `domain.` or `domain.fragment`.

use std::ops::Range;

use serde::Serialize;

use crate::keywords::AUTOCOMPLETE_MAX_SUGGESTIONS;
use crate::types::{DeviceRecord, domain_of};

/// Parsed form of the token being typed. Both halves are lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteQuery {
    pub domain: String,
    /// May be empty: `light.` lists the whole domain.
    pub fragment: String,
}

/// One suggestion plus the byte ranges of `entity_id` to emphasise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion<'a> {
    pub record: &'a DeviceRecord,
    pub highlight: Vec<Range<usize>>,
}

/// The token the user is typing. Trailing whitespace yields `""`.
pub fn last_token(input: &str) -> &str {
    input.rsplit(char::is_whitespace).next().unwrap_or("")
}

/// Parse the last token of `input`, or `None` when it has no domain separator.
///
/// The fragment is the segment between the first and second dots; anything
/// after a second dot is ignored. Case folding is ASCII-only: host entity
/// ids are ASCII slugs, and ASCII folding keeps highlight offsets valid
/// byte positions in the original id.
pub fn parse_query(input: &str) -> Option<AutocompleteQuery> {
    let mut parts = last_token(input).split('.');
    let domain = parts.next()?;
    let fragment = parts.next()?;
    Some(AutocompleteQuery {
        domain: domain.to_ascii_lowercase(),
        fragment: fragment.to_ascii_lowercase(),
    })
}

/// Suggestions for `input`, at most `limit` (clamped to 15).
///
/// Prefix matches on the object id sort first, then everything else by
/// case-insensitive id.
pub fn suggest<'a>(input: &str, records: &'a [DeviceRecord], limit: usize) -> Vec<Suggestion<'a>> {
    let Some(query) = parse_query(input) else {
        return Vec::new();
    };
    let limit = limit.min(AUTOCOMPLETE_MAX_SUGGESTIONS);

    let mut matches: Vec<(bool, String, &DeviceRecord)> = records
        .iter()
        .filter_map(|record| {
            let id_lower = record.entity_id.to_ascii_lowercase();
            if domain_of(&id_lower) != query.domain {
                return None;
            }
            let remainder = id_lower.split_once('.').map(|(_, rest)| rest).unwrap_or("");
            if !remainder.contains(query.fragment.as_str()) {
                return None;
            }
            let prefix = remainder.starts_with(query.fragment.as_str());
            Some((prefix, id_lower, record))
        })
        .collect();

    matches.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    matches
        .into_iter()
        .take(limit)
        .map(|(_, _, record)| Suggestion {
            record,
            highlight: highlight_ranges(&record.entity_id, &query.fragment),
        })
        .collect()
}

/// Non-overlapping, case-insensitive occurrences of `needle` in `text`.
///
/// Matching is literal; characters such as `(` or `*` in the needle have no
/// special meaning.
pub fn highlight_ranges(text: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }
    // ASCII lowering keeps byte offsets aligned with `text`.
    let haystack = text.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut ranges = Vec::new();
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle.as_str()) {
        let start = from + pos;
        let end = start + needle.len();
        ranges.push(start..end);
        from = end;
    }
    ranges
}

/// Wrap each range of `text` in `open`/`close` markers.
pub fn render_highlight(text: &str, ranges: &[Range<usize>], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for range in ranges {
        if range.start < cursor || range.end > text.len() {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push_str(open);
        out.push_str(&text[range.clone()]);
        out.push_str(close);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Replace the token being typed with `entity_id` and a trailing space.
pub fn apply_suggestion(input: &str, entity_id: &str) -> String {
    let start = input
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    format!("{}{entity_id} ", &input[..start])
}
