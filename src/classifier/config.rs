use std::path::PathBuf;

use super::error::ClassifierError;
use crate::constants::MAX_SEQ_LEN;

#[derive(Debug, Clone)]
/// Configuration for [`BiasClassifier`](super::BiasClassifier).
pub struct ClassifierConfig {
    /// Checkpoint directory (`config.json`, `model.safetensors`,
    /// `tokenizer.json`, optional `temperature.json`).
    pub model_dir: Option<PathBuf>,
    /// Tokenizer file; defaults to `tokenizer.json` inside `model_dir`.
    pub tokenizer_path: Option<PathBuf>,
    /// Max tokens per input (longer input is truncated, not rejected).
    pub max_seq_len: usize,
    /// If true, run the deterministic stub backend (no model files required).
    pub testing_stub: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            tokenizer_path: None,
            max_seq_len: MAX_SEQ_LEN,
            testing_stub: false,
        }
    }
}

impl ClassifierConfig {
    /// Env var used to locate the checkpoint directory.
    pub const ENV_MODEL_DIR: &'static str = "BIASLENS_MODEL_DIR";
    /// Env var used to override the tokenizer file path.
    pub const ENV_TOKENIZER_PATH: &'static str = "BIASLENS_TOKENIZER_PATH";

    /// Creates a config for a checkpoint directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; deterministic outputs).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Loads config from environment variables (missing values stay unset).
    pub fn from_env() -> Self {
        let model_dir = std::env::var(Self::ENV_MODEL_DIR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let tokenizer_path = std::env::var(Self::ENV_TOKENIZER_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_dir,
            tokenizer_path,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.testing_stub {
            return Ok(());
        }

        let Some(ref model_dir) = self.model_dir else {
            return Err(ClassifierError::InvalidConfig {
                reason: "model_dir is required (stub mode is disabled)".to_string(),
            });
        };

        if !model_dir.is_dir() {
            return Err(ClassifierError::CheckpointNotFound {
                path: model_dir.clone(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(ClassifierError::InvalidConfig {
                reason: "max_seq_len must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Resolved tokenizer file path (explicit override, else checkpoint-local).
    pub fn tokenizer_file(&self) -> Option<PathBuf> {
        self.tokenizer_path.clone().or_else(|| {
            self.model_dir
                .as_ref()
                .map(|dir| dir.join("tokenizer.json"))
        })
    }

    /// Returns `true` if a checkpoint directory is configured and present.
    pub fn model_available(&self) -> bool {
        self.model_dir.as_deref().is_some_and(|d| d.is_dir())
    }
}
