use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::rationale::ExplainError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("explanation failed: {0}")]
    Explain(#[from] ExplainError),
}
