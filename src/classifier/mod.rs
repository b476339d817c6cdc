//! Calibrated political-bias classification.
//!
//! [`BiasClassifier`] wraps the scoring model, tokenizer, calibration
//! temperature and label map into one immutable context: everything is
//! loaded once and read-only afterwards, so concurrent calls need no
//! locking. Use [`ClassifierConfig::stub`] for tests without model files.

pub mod calibration;
/// Classifier configuration.
pub mod config;
mod error;
/// Class-index to label-name mapping.
pub mod labels;
mod stub;
/// Result types.
pub mod types;

#[cfg(test)]
mod tests;

pub use config::ClassifierConfig;
pub use error::ClassifierError;
pub use labels::LabelMap;
pub use types::Classification;

use std::collections::BTreeMap;
use std::path::Path;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_LABELS, DEFAULT_TEMPERATURE, FALLBACK_LABEL};
use crate::model::{CheckpointMeta, SequenceClassifier, select_device};

enum Backend {
    Candle {
        model: SequenceClassifier,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Political-bias classifier with temperature-calibrated probabilities.
pub struct BiasClassifier {
    backend: Backend,
    labels: LabelMap,
    temperature: f64,
    mask_token: String,
    config: ClassifierConfig,
}

impl std::fmt::Debug for BiasClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiasClassifier")
            .field(
                "backend",
                &match &self.backend {
                    Backend::Candle { device, .. } => format!("Candle({:?})", device),
                    Backend::Stub => "Stub".to_string(),
                },
            )
            .field("labels", &self.labels.names())
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl BiasClassifier {
    /// Loads the classifier from a config (stub mode is supported).
    pub fn load(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;

        if config.testing_stub {
            warn!("bias classifier running in STUB mode (testing only)");
            return Ok(Self {
                backend: Backend::Stub,
                labels: LabelMap::default(),
                temperature: DEFAULT_TEMPERATURE,
                mask_token: "[MASK]".to_string(),
                config,
            });
        }

        let model_dir = config.model_dir.clone().ok_or_else(|| {
            ClassifierError::InvalidConfig {
                reason: "model_dir is required (stub mode is disabled)".to_string(),
            }
        })?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for bias classifier");

        let meta = match CheckpointMeta::read(&model_dir) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(error = %e, "failed to read checkpoint metadata, using default labels");
                CheckpointMeta::default()
            }
        };
        let labels = LabelMap::from_id2label(meta.id2label.as_ref());

        let model = SequenceClassifier::load(&model_dir, labels.len(), &device)?;

        let tokenizer_path = config.tokenizer_file().ok_or_else(|| {
            ClassifierError::InvalidConfig {
                reason: "tokenizer path could not be resolved".to_string(),
            }
        })?;
        let tokenizer = load_tokenizer_with_truncation(&tokenizer_path, config.max_seq_len)?;
        let mask_token = detect_mask_token(&tokenizer);

        let temperature = calibration::load_temperature(&model_dir);

        info!(
            model_dir = %model_dir.display(),
            temperature,
            num_labels = labels.len(),
            mask_token = %mask_token,
            "bias classifier loaded"
        );

        Ok(Self {
            backend: Backend::Candle {
                model,
                tokenizer,
                device,
            },
            labels,
            temperature,
            mask_token,
            config,
        })
    }

    /// Loads a stub classifier.
    pub fn stub() -> Result<Self, ClassifierError> {
        Self::load(ClassifierConfig::stub())
    }

    /// Classifies `text` into a bias label with a calibrated distribution.
    ///
    /// Empty or whitespace-only input yields the fixed neutral fallback.
    /// Scoring-model failures propagate; they are not retried here.
    pub fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        if text.trim().is_empty() {
            debug!("empty input, returning neutral fallback");
            return Ok(Classification::neutral_fallback());
        }

        let logits = self.raw_logits(text)?;
        let probs = softmax_scaled(&logits, self.temperature);
        let class_index = argmax(&probs);
        let label = self.label_name(class_index);

        let confidence = round3(probs[class_index]);
        let probs_by_label: BTreeMap<String, f64> = probs
            .iter()
            .enumerate()
            .map(|(i, p)| (self.label_name(i), round3(*p)))
            .collect();

        debug!(label = %label, confidence, "classification complete");

        Ok(Classification {
            label,
            confidence,
            probs: probs_by_label,
            rationale_spans: Vec::new(),
            class_index,
        })
    }

    /// Plain (uncalibrated) softmax probabilities for a batch of texts.
    ///
    /// This is the scoring surface the attribution explainer perturbs;
    /// empty input is scored like any other string here.
    pub fn predict_proba(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, ClassifierError> {
        texts
            .iter()
            .map(|text| Ok(softmax_scaled(&self.raw_logits(text)?, 1.0)))
            .collect()
    }

    /// Token byte-offset ranges for `text`, without special tokens,
    /// truncated to `max_length`.
    pub fn encode_offsets(
        &self,
        text: &str,
        max_length: usize,
    ) -> Result<Vec<(usize, usize)>, ClassifierError> {
        match &self.backend {
            Backend::Candle { tokenizer, .. } => {
                let encoding = tokenizer.encode(text, false).map_err(|e| {
                    ClassifierError::TokenizationFailed {
                        reason: e.to_string(),
                    }
                })?;
                let mut offsets = encoding.get_offsets().to_vec();
                offsets.truncate(max_length);
                Ok(offsets)
            }
            Backend::Stub => Ok(stub::offsets(text, max_length)),
        }
    }

    fn raw_logits(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
        match &self.backend {
            Backend::Candle {
                model,
                tokenizer,
                device,
            } => {
                let encoding = tokenizer.encode(text, true).map_err(|e| {
                    ClassifierError::TokenizationFailed {
                        reason: e.to_string(),
                    }
                })?;

                let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
                let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
                let attention_mask =
                    Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

                let logits = model.forward(&input_ids, &type_ids, Some(&attention_mask))?;
                let row = logits.flatten_all()?.to_vec1::<f32>()?;
                Ok(row.into_iter().map(f64::from).collect())
            }
            Backend::Stub => Ok(stub::logits(text)),
        }
    }

    fn label_name(&self, idx: usize) -> String {
        self.labels
            .name(idx)
            .or_else(|| DEFAULT_LABELS.get(idx).copied())
            .unwrap_or(FALLBACK_LABEL)
            .to_string()
    }

    /// Returns the label map.
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Returns the calibration temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns the number of bias classes.
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// The tokenizer's mask token, used for textual perturbation.
    pub fn mask_token(&self) -> &str {
        &self.mask_token
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, Backend::Stub)
    }

    /// Returns the classifier configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

/// Loads a `tokenizer.json` with truncation enabled at `max_len` tokens.
fn load_tokenizer_with_truncation(
    path: &Path,
    max_len: usize,
) -> Result<Tokenizer, ClassifierError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| ClassifierError::LoadFailed {
            reason: format!("failed to load tokenizer: {}", e),
        })?;

    let truncation = tokenizers::TruncationParams {
        max_length: max_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| ClassifierError::LoadFailed {
            reason: format!("failed to configure truncation: {}", e),
        })?;

    Ok(tokenizer)
}

fn detect_mask_token(tokenizer: &Tokenizer) -> String {
    for candidate in ["[MASK]", "<mask>"] {
        if tokenizer.token_to_id(candidate).is_some() {
            return candidate.to_string();
        }
    }
    "[MASK]".to_string()
}

/// Temperature-scaled, max-subtracted softmax.
///
/// The max element is subtracted before exponentiation; the result is
/// identical to the unshifted computation but cannot overflow.
pub fn softmax_scaled(logits: &[f64], temperature: f64) -> Vec<f64> {
    if logits.is_empty() {
        return Vec::new();
    }
    let scaled: Vec<f64> = logits.iter().map(|z| z / temperature).collect();
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scaled.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the maximum element (first occurrence wins ties).
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Rounds to 3 decimal places, half away from zero.
///
/// Applied uniformly to confidence and every probability value.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
