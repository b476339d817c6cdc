use tracing::debug;

use super::patterns::KEYWORD_PATTERNS;
use super::types::{RationaleSpan, SpanSource};
use crate::constants::KEYWORD_SPAN_SCORE;

/// Scans `text` for politically salient phrases.
///
/// Every match becomes a span with the fixed score 0.15 and no sign. Matches
/// from all patterns are pooled, stably sorted by start offset, and
/// truncated to the first `k`. Overlapping matches from different patterns
/// are kept as-is.
pub fn scan_keywords(text: &str, k: usize) -> Vec<RationaleSpan> {
    let mut spans = Vec::new();
    if text.is_empty() {
        return spans;
    }

    for pattern in KEYWORD_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            spans.push(RationaleSpan {
                start: m.start(),
                end: m.end(),
                text: text[m.start()..m.end()].to_string(),
                score: KEYWORD_SPAN_SCORE,
                value: None,
                sign: None,
                source: SpanSource::Keyword,
            });
        }
    }

    spans.sort_by_key(|span| span.start);
    spans.truncate(k);

    debug!(spans = spans.len(), "keyword scan complete");
    spans
}
