use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LABELS, FALLBACK_CONFIDENCE, FALLBACK_LABEL, FALLBACK_PROBS};
use crate::rationale::RationaleSpan;

/// Outcome of a single classification call.
///
/// Created fresh per call and never mutated after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted bias label.
    pub label: String,
    /// Probability of the predicted label, rounded to 3 decimals.
    pub confidence: f64,
    /// Full calibrated distribution by label, each rounded to 3 decimals.
    pub probs: BTreeMap<String, f64>,
    /// Evidence spans, populated by the orchestrator.
    pub rationale_spans: Vec<RationaleSpan>,
    /// Class index of `label`, used to target the attribution explainer.
    #[serde(skip)]
    pub class_index: usize,
}

impl Classification {
    /// The fixed result for empty or whitespace-only input.
    pub fn neutral_fallback() -> Self {
        let probs = FALLBACK_PROBS
            .iter()
            .map(|(label, p)| (label.to_string(), *p))
            .collect();
        let class_index = DEFAULT_LABELS
            .iter()
            .position(|l| *l == FALLBACK_LABEL)
            .unwrap_or(0);
        Self {
            label: FALLBACK_LABEL.to_string(),
            confidence: FALLBACK_CONFIDENCE,
            probs,
            rationale_spans: Vec::new(),
            class_index,
        }
    }
}
