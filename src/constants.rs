//! Cross-cutting, shared constants.
//!
//! The label set, fallback result, and span defaults are referenced from
//! several modules (classifier, rationale, pipeline, server) and from tests.
//! Prefer these named constants over scattered literals.

/// Number of bias classes the scoring model emits.
pub const NUM_CLASSES: usize = 3;

/// Fixed label order used when a checkpoint carries no `id2label` mapping.
pub const DEFAULT_LABELS: [&str; NUM_CLASSES] = ["Left", "Center", "Right"];

/// Token truncation limit for classification and attribution inputs.
pub const MAX_SEQ_LEN: usize = 512;

/// Temperature applied when no calibration sidecar is present (no scaling).
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Label returned for empty or whitespace-only input.
pub const FALLBACK_LABEL: &str = "Center";

/// Confidence returned for empty or whitespace-only input.
pub const FALLBACK_CONFIDENCE: f64 = 0.34;

/// Near-uniform distribution returned for empty or whitespace-only input.
///
/// Fixed constants, not a computed distribution: the fallback result must be
/// bit-for-bit reproducible.
pub const FALLBACK_PROBS: [(&str, f64); NUM_CLASSES] =
    [("Left", 0.33), ("Center", 0.34), ("Right", 0.33)];

/// Default number of rationale spans returned per call.
pub const DEFAULT_TOP_K_SPANS: usize = 6;

/// Fixed weak-evidence score assigned to every keyword span.
///
/// Deliberately constant: keyword matches are heuristic color, not a
/// comparative importance measure.
pub const KEYWORD_SPAN_SCORE: f64 = 0.15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_probs_cover_all_labels() {
        assert_eq!(FALLBACK_PROBS.len(), DEFAULT_LABELS.len());
        for (label, _) in FALLBACK_PROBS {
            assert!(DEFAULT_LABELS.contains(&label));
        }
    }

    #[test]
    fn test_fallback_confidence_matches_fallback_label_prob() {
        let center = FALLBACK_PROBS
            .iter()
            .find(|(label, _)| *label == FALLBACK_LABEL)
            .map(|(_, p)| *p);
        assert_eq!(center, Some(FALLBACK_CONFIDENCE));
    }
}
