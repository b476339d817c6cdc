use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::error::ModelError;

/// Fields of the HuggingFace `config.json` that the candle BERT config does
/// not carry but the classifier needs at load time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckpointMeta {
    /// Class index (as a decimal string key) to label name.
    #[serde(default)]
    pub id2label: Option<HashMap<String, String>>,
}

impl CheckpointMeta {
    /// Reads the metadata from a checkpoint directory's `config.json`.
    pub fn read(model_dir: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(model_dir.join("config.json"))?;
        serde_json::from_str(&content).map_err(|e| ModelError::LoadFailed {
            reason: format!("failed to parse config.json: {}", e),
        })
    }
}

enum ClassificationHead {
    /// BERT-style head: one linear layer over the CLS token.
    Linear(Linear),
    /// RoBERTa-style head: dense + tanh + projection over the CLS token.
    Roberta { dense: Linear, out_proj: Linear },
}

impl ClassificationHead {
    fn load(vb: &VarBuilder, hidden_size: usize, num_labels: usize) -> Result<Self, ModelError> {
        if vb.contains_tensor("classifier.dense.weight") {
            let dense = candle_nn::linear(hidden_size, hidden_size, vb.pp("classifier.dense"))
                .map_err(load_failed)?;
            let out_proj = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier.out_proj"))
                .map_err(load_failed)?;
            Ok(Self::Roberta { dense, out_proj })
        } else {
            let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))
                .map_err(load_failed)?;
            Ok(Self::Linear(classifier))
        }
    }

    fn forward(&self, cls: &Tensor) -> Result<Tensor, candle_core::Error> {
        match self {
            Self::Linear(classifier) => classifier.forward(cls),
            Self::Roberta { dense, out_proj } => {
                let hidden = dense.forward(cls)?.tanh()?;
                out_proj.forward(&hidden)
            }
        }
    }
}

/// A BERT (or RoBERTa) encoder with a sequence-classification head.
///
/// Loads from a checkpoint directory containing `config.json` and
/// `model.safetensors`; `bert.`-, `roberta.`- and un-prefixed weight layouts
/// are all accepted.
pub struct SequenceClassifier {
    bert: BertModel,
    head: ClassificationHead,
    num_labels: usize,
}

impl SequenceClassifier {
    pub fn load(
        model_dir: &Path,
        num_labels: usize,
        device: &Device,
    ) -> Result<Self, ModelError> {
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        if !config_path.exists() || !weights_path.exists() {
            return Err(ModelError::CheckpointNotFound {
                path: model_dir.to_path_buf(),
            });
        }

        let config_content = std::fs::read_to_string(&config_path)?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| ModelError::LoadFailed {
                reason: format!("failed to parse config.json: {}", e),
            })?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
                .map_err(load_failed)?;

        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), &config)
        } else {
            BertModel::load(vb.clone(), &config)
        }
        .map_err(load_failed)?;

        let head = ClassificationHead::load(&vb, config.hidden_size, num_labels)?;

        Ok(Self {
            bert,
            head,
            num_labels,
        })
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor, ModelError> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls = hidden.i((.., 0, ..))?;
        Ok(self.head.forward(&cls)?)
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }
}

fn load_failed(err: candle_core::Error) -> ModelError {
    ModelError::LoadFailed {
        reason: err.to_string(),
    }
}
