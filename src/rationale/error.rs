use thiserror::Error;

use crate::classifier::ClassifierError;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("classifier error during attribution: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("attribution target {index} out of range for {num_classes} classes")]
    InvalidTarget { index: usize, num_classes: usize },

    #[error("attribution computation failed: {reason}")]
    ComputationFailed { reason: String },
}
