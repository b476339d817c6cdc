use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classifier::Classification;
use crate::priors::SourcePrior;
use crate::rationale::RationaleSpan;

/// Body of `POST /predict` and the elements of `POST /batch_predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub text: String,
    /// Request attribution-based spans instead of keyword spans.
    #[serde(default, rename = "useShap")]
    pub use_shap: bool,
}

/// Body of `POST /predict_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictUrlRequest {
    pub url: String,
}

/// The model's bias judgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasOut {
    pub label: String,
    pub confidence: f64,
    pub probs: BTreeMap<String, f64>,
}

/// Spans to highlight for the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainOut {
    pub spans: Vec<RationaleSpan>,
}

/// Response of the predict endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub summary: String,
    pub bias: BiasOut,
    pub explain: ExplainOut,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_prior: Option<SourcePrior>,
}

impl PredictResponse {
    /// Assembles a response from a pipeline result.
    pub fn from_classification(
        summary: String,
        classification: Classification,
        source_prior: Option<SourcePrior>,
    ) -> Self {
        Self {
            summary,
            bias: BiasOut {
                label: classification.label,
                confidence: classification.confidence,
                probs: classification.probs,
            },
            explain: ExplainOut {
                spans: classification.rationale_spans,
            },
            source_prior,
        }
    }
}

/// Response of `GET /healthz`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub time: String,
}

/// Response of `GET /model` (minimal model card).
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub labels: Vec<String>,
    pub temperature: f64,
    /// `"real"` when a checkpoint is loaded, `"stub"` otherwise.
    pub mode: String,
}
