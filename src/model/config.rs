use candle_transformers::models::bert::Config as BertConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// `config.json` of a BERT sequence-classification checkpoint.
///
/// candle's [`BertConfig`] keeps its sizes private, so the fields the
/// classification head needs are read a second time into [`HeadConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    pub bert: BertConfig,
    pub head: HeadConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeadConfig {
    pub hidden_size: usize,
    pub max_position_embeddings: usize,
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub architectures: Vec<String>,
    #[serde(default)]
    pub problem_type: Option<String>,
}

/// How logits become label scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// Mutually exclusive labels, scores sum to one.
    Softmax,
    /// Independent per-label probabilities.
    Sigmoid,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ModelUnavailable(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let bert: BertConfig = serde_json::from_str(raw).map_err(Error::unavailable)?;
        let head: HeadConfig = serde_json::from_str(raw).map_err(Error::unavailable)?;
        head.validate()?;
        Ok(Self { bert, head })
    }

    pub fn num_labels(&self) -> usize {
        self.head.id2label.len()
    }

    /// A single-logit head or a multi-label checkpoint scores each label on
    /// its own; everything else is a softmax over the label set.
    pub fn scoring(&self) -> Scoring {
        let multi_label =
            self.head.problem_type.as_deref() == Some("multi_label_classification");
        if self.num_labels() == 1 || multi_label {
            Scoring::Sigmoid
        } else {
            Scoring::Softmax
        }
    }

    /// Label for a class index, `LABEL_{id}` when the checkpoint has none.
    pub fn label(&self, id: usize) -> String {
        self.head
            .id2label
            .get(&id.to_string())
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{id}"))
    }
}

impl HeadConfig {
    fn validate(&self) -> Result<()> {
        if self.id2label.is_empty() {
            return Err(Error::ModelUnavailable(
                "config has no id2label, not a classification checkpoint".to_string(),
            ));
        }
        let n = self.id2label.len();
        for key in self.id2label.keys() {
            match key.parse::<usize>() {
                Ok(id) if id < n => {}
                _ => {
                    return Err(Error::ModelUnavailable(format!(
                        "id2label key {key:?} is not a class index below {n}"
                    )))
                }
            }
        }
        if !self.architectures.is_empty()
            && !self
                .architectures
                .iter()
                .any(|a| a.ends_with("ForSequenceClassification"))
        {
            return Err(Error::ModelUnavailable(format!(
                "architectures {:?} do not include a sequence classifier",
                self.architectures
            )));
        }
        Ok(())
    }
}
