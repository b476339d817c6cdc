//! Deterministic model-free backend.
//!
//! Scores text with a fixed lexicon of partisan cue phrases so the full
//! pipeline (calibration, attribution, merging) stays testable without a
//! checkpoint. Outputs are bit-identical across calls and processes.

/// Cue phrases that push the stub score toward the Left class.
const LEFT_CUES: &[&str] = &[
    "progressive",
    "left-wing",
    "left wing",
    "climate",
    "inequality",
    "union",
    "regulation",
    "medicare",
];

/// Cue phrases that push the stub score toward the Right class.
const RIGHT_CUES: &[&str] = &[
    "conservative",
    "right-wing",
    "right wing",
    "radical",
    "extremist",
    "invasion",
    "open borders",
    "soft on crime",
    "tax-and-spend",
    "gun",
];

/// Cue phrases that push the stub score toward the Center class.
const CENTER_CUES: &[&str] = &[
    "bipartisan",
    "both parties",
    "compromise",
    "moderate",
    "nonpartisan",
];

/// Baseline Center logit so cue-free text stays neutral.
const CENTER_BASELINE: f64 = 0.4;

const CUE_WEIGHT: f64 = 0.9;

/// Pseudo-logits for `text`, one per class in `[Left, Center, Right]` order.
pub(super) fn logits(text: &str) -> Vec<f64> {
    let lower = text.to_lowercase();
    let count = |cues: &[&str]| -> f64 {
        cues.iter()
            .map(|cue| lower.matches(cue).count())
            .sum::<usize>() as f64
    };

    vec![
        CUE_WEIGHT * count(LEFT_CUES),
        CENTER_BASELINE + CUE_WEIGHT * count(CENTER_CUES),
        CUE_WEIGHT * count(RIGHT_CUES),
    ]
}

/// Stub tokenization: alphanumeric runs and single punctuation marks, with
/// byte offsets into `text`; whitespace produces no tokens.
pub(super) fn offsets(text: &str, max_length: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else {
            if let Some(start) = run_start.take() {
                out.push((start, i));
            }
            if !ch.is_whitespace() {
                out.push((i, i + ch.len_utf8()));
            }
        }
    }
    if let Some(start) = run_start {
        out.push((start, text.len()));
    }

    out.truncate(max_length);
    out
}
