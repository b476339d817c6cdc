//! Perturbation-based rationale extraction.
//!
//! Token attributions are estimated with a partition scheme over the token
//! sequence: ranges are split recursively, each half is scored with and
//! without its sibling present (two-order average), and leaf values are
//! rescaled so every subtree keeps its assigned share. Masking is textual:
//! inactive token ranges are spliced over with the tokenizer's mask token
//! while every other byte of the input stays intact.
//!
//! The attribution target is always the already-predicted class; failures
//! propagate to the caller with no fallback to the keyword scanner here.

use std::cmp::Ordering;
use tracing::debug;

use super::error::ExplainError;
use super::types::{RationaleSpan, SpanSource};
use crate::classifier::BiasClassifier;
use crate::constants::{DEFAULT_TOP_K_SPANS, MAX_SEQ_LEN};

/// Options for [`explain_spans`].
#[derive(Debug, Clone)]
pub struct ExplainOptions {
    /// Maximum spans returned.
    pub top_k: usize,
    /// Token truncation limit.
    pub max_length: usize,
    /// Merge character-contiguous same-sign tokens into one span.
    pub merge: bool,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K_SPANS,
            max_length: MAX_SEQ_LEN,
            merge: true,
        }
    }
}

/// Candidate span before normalization and ranking.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    value: f64,
}

/// Extracts the top-k attribution spans for `target_idx` on `text`.
///
/// Empty or whitespace-only text yields an empty vec. Offsets and
/// attribution values are truncated to the shorter of the two before span
/// assembly, so a length mismatch can never index out of range.
pub fn explain_spans(
    classifier: &BiasClassifier,
    text: &str,
    target_idx: usize,
    opts: &ExplainOptions,
) -> Result<Vec<RationaleSpan>, ExplainError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let num_classes = classifier.num_classes();
    if target_idx >= num_classes {
        return Err(ExplainError::InvalidTarget {
            index: target_idx,
            num_classes,
        });
    }

    let offsets = classifier.encode_offsets(text, opts.max_length)?;
    if offsets.is_empty() {
        return Ok(Vec::new());
    }

    let values = token_attributions(classifier, text, &offsets, target_idx)?;
    let n = offsets.len().min(values.len());
    let offsets = &offsets[..n];
    let values = &values[..n];

    let candidates = if opts.merge {
        merge_adjacent(offsets, values)
    } else {
        per_token(offsets, values)
    };

    let spans = finalize(text, candidates, opts.top_k);
    debug!(
        spans = spans.len(),
        target = target_idx,
        merged = opts.merge,
        "attribution complete"
    );
    Ok(spans)
}

/// Per-token attribution values for the target class.
///
/// Cost is two model evaluations per split node, roughly `2n` calls for `n`
/// tokens, plus the two endpoints (all-masked and unmasked).
fn token_attributions(
    classifier: &BiasClassifier,
    text: &str,
    offsets: &[(usize, usize)],
    target: usize,
) -> Result<Vec<f64>, ExplainError> {
    let n = offsets.len();
    let scorer = MaskScorer {
        classifier,
        text,
        offsets,
        target,
    };

    let mut active = vec![false; n];
    let f_none = scorer.score(&active)?;
    active.fill(true);
    let f_all = scorer.score(&active)?;
    active.fill(false);

    let mut values = vec![0.0; n];
    attribute_range(&scorer, &mut active, 0, n, f_none, f_all, &mut values)?;
    Ok(values)
}

struct MaskScorer<'a> {
    classifier: &'a BiasClassifier,
    text: &'a str,
    offsets: &'a [(usize, usize)],
    target: usize,
}

impl MaskScorer<'_> {
    /// Target-class probability of the text with inactive tokens masked.
    fn score(&self, active: &[bool]) -> Result<f64, ExplainError> {
        let masked = mask_text(
            self.text,
            self.offsets,
            active,
            self.classifier.mask_token(),
        );
        let probs = self.classifier.predict_proba(&[masked])?;
        probs
            .first()
            .and_then(|row| row.get(self.target).copied())
            .ok_or_else(|| ExplainError::ComputationFailed {
                reason: "scoring model returned no probability for the target class".to_string(),
            })
    }
}

/// Distributes `f(ctx ∪ [lo,hi)) - f(ctx)` over the tokens of `[lo, hi)`.
///
/// `active` must have `[lo, hi)` all false on entry and is restored before
/// returning. The two halves' shares always sum to the parent's value, so
/// the leaf values over the whole call sum to `f_all - f_none`.
#[allow(clippy::too_many_arguments)]
fn attribute_range(
    scorer: &MaskScorer<'_>,
    active: &mut [bool],
    lo: usize,
    hi: usize,
    f_ctx: f64,
    f_ctx_with: f64,
    values: &mut [f64],
) -> Result<(), ExplainError> {
    if hi - lo == 1 {
        values[lo] = f_ctx_with - f_ctx;
        return Ok(());
    }

    let mid = lo + (hi - lo) / 2;

    active[lo..mid].fill(true);
    let f_ctx_left = scorer.score(active)?;
    active[lo..mid].fill(false);

    active[mid..hi].fill(true);
    let f_ctx_right = scorer.score(active)?;
    active[mid..hi].fill(false);

    let total = f_ctx_with - f_ctx;
    let left_share = 0.5 * ((f_ctx_left - f_ctx) + (f_ctx_with - f_ctx_right));
    let right_share = total - left_share;

    attribute_range(scorer, active, lo, mid, f_ctx, f_ctx_left, values)?;
    rescale(&mut values[lo..mid], f_ctx_left - f_ctx, left_share);

    attribute_range(scorer, active, mid, hi, f_ctx, f_ctx_right, values)?;
    rescale(&mut values[mid..hi], f_ctx_right - f_ctx, right_share);

    Ok(())
}

/// Rescales a subtree's leaf values from their raw sum to the share the
/// parent assigned it; a (near-)zero raw sum distributes uniformly.
fn rescale(values: &mut [f64], raw_total: f64, assigned: f64) {
    if values.is_empty() {
        return;
    }
    if raw_total.abs() > 1e-12 {
        let factor = assigned / raw_total;
        for v in values.iter_mut() {
            *v *= factor;
        }
    } else {
        let uniform = assigned / values.len() as f64;
        for v in values.iter_mut() {
            *v = uniform;
        }
    }
}

/// Rebuilds `text` with inactive token ranges replaced by `mask_token`.
///
/// Bytes outside token ranges (whitespace, anything the tokenizer skipped)
/// are copied through verbatim; zero-width tokens contribute nothing.
fn mask_text(
    text: &str,
    offsets: &[(usize, usize)],
    active: &[bool],
    mask_token: &str,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for (i, &(start, end)) in offsets.iter().enumerate() {
        if start < cursor {
            continue;
        }
        out.push_str(&text[cursor..start]);
        if active[i] {
            out.push_str(&text[start..end]);
        } else if start < end {
            out.push_str(mask_token);
        }
        cursor = end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Merges adjacent tokens into one candidate when the next token starts
/// exactly where the previous ended (no gap, not even whitespace) and its
/// attribution sign matches the running span's sign. A merged candidate's
/// value is the sum of its member values.
fn merge_adjacent(offsets: &[(usize, usize)], values: &[f64]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let Some((&(first_start, first_end), &first_value)) =
        offsets.iter().zip(values.iter()).next()
    else {
        return out;
    };

    let mut current = Candidate {
        start: first_start,
        end: first_end,
        value: first_value,
    };
    let mut last_end = first_end;
    let mut span_sign = sign_of(first_value);

    for (&(start, end), &value) in offsets.iter().zip(values.iter()).skip(1) {
        let contiguous = start == last_end;
        if contiguous && sign_of(value) == span_sign {
            current.end = end;
            current.value += value;
            last_end = end;
        } else {
            out.push(current);
            current = Candidate { start, end, value };
            last_end = end;
            span_sign = sign_of(value);
        }
    }
    out.push(current);
    out
}

/// One candidate per token, skipping zero-width tokens.
fn per_token(offsets: &[(usize, usize)], values: &[f64]) -> Vec<Candidate> {
    offsets
        .iter()
        .zip(values.iter())
        .filter(|&(&(start, end), _)| start < end)
        .map(|(&(start, end), &value)| Candidate { start, end, value })
        .collect()
}

/// Normalizes, signs, ranks by descending |value| (stable), and truncates.
fn finalize(text: &str, candidates: Vec<Candidate>, top_k: usize) -> Vec<RationaleSpan> {
    let max_abs = candidates
        .iter()
        .map(|c| c.value.abs())
        .fold(0.0_f64, f64::max);
    let denom = if max_abs > 0.0 { max_abs } else { 1.0 };

    let mut spans: Vec<RationaleSpan> = candidates
        .into_iter()
        .map(|c| RationaleSpan {
            start: c.start,
            end: c.end,
            text: text[c.start..c.end].to_string(),
            score: c.value.abs() / denom,
            value: Some(c.value),
            sign: Some(sign_of(c.value)),
            source: SpanSource::Shap,
        })
        .collect();

    spans.sort_by(|a, b| {
        let a_abs = a.value.unwrap_or(0.0).abs();
        let b_abs = b.value.unwrap_or(0.0).abs();
        b_abs.partial_cmp(&a_abs).unwrap_or(Ordering::Equal)
    });
    spans.truncate(top_k);
    spans
}

fn sign_of(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
