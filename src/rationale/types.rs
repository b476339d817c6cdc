use serde::{Deserialize, Serialize};

/// Which extractor produced a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanSource {
    /// Keyword pattern scanner.
    Keyword,
    /// Perturbation-based attribution explainer.
    Shap,
}

/// A contiguous character range flagged as evidence for (or against) the
/// predicted label.
///
/// `start`/`end` are byte offsets into the classified text; `text` is always
/// the exact slice `input[start..end]`, never reconstructed from tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationaleSpan {
    /// Byte offset of the span start.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
    /// Exact substring at `[start, end)`.
    pub text: String,
    /// Normalized importance in `[0, 1]`.
    pub score: f64,
    /// Raw signed attribution value (attribution spans only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Sign of `value`: -1, 0 or 1 (attribution spans only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<i8>,
    /// Producing extractor.
    pub source: SpanSource,
}
