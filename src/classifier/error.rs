use std::path::PathBuf;
use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier checkpoint not found at path: {path}")]
    CheckpointNotFound { path: PathBuf },

    #[error("failed to load classifier: {reason}")]
    LoadFailed { reason: String },

    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("classifier inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid classifier configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for ClassifierError {
    fn from(err: candle_core::Error) -> Self {
        ClassifierError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<ModelError> for ClassifierError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::CheckpointNotFound { path } => {
                ClassifierError::CheckpointNotFound { path }
            }
            ModelError::LoadFailed { reason } => ClassifierError::LoadFailed { reason },
            ModelError::DeviceUnavailable { device, reason } => {
                ClassifierError::DeviceUnavailable { device, reason }
            }
            ModelError::InferenceFailed { reason } => {
                ClassifierError::InferenceFailed { reason }
            }
        }
    }
}
