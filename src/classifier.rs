pub use candle_core::Device;

use candle_core::{DType, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::BertModel;
use crate::error::{Error, Result};
use crate::model::{Config, ModelFiles, Scoring};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokenizers::Tokenizer;
use tracing::info;

/// One candidate of a ranked classification.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// A pre-trained text classifier.
///
/// Returns every label of the model's fixed label set, highest score first.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// BERT encoder with the pooler and linear head of a
/// `BertForSequenceClassification` checkpoint.
pub struct BertSequenceClassifier {
    bert: BertModel,
    pooler: Linear,
    head: Linear,
    config: Config,
    tokenizer: Tokenizer,
    device: Device,
}

impl BertSequenceClassifier {
    pub fn load_dir<P: AsRef<Path>>(path: P, device: Device) -> Result<Self> {
        Self::load(&ModelFiles::from_dir(path)?, device)
    }

    pub fn load(files: &ModelFiles, device: Device) -> Result<Self> {
        let config = Config::from_file(&files.config)?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer).map_err(Error::unavailable)?;
        tokenizer
            .with_padding(None)
            .with_truncation(None)
            .map_err(Error::unavailable)?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)
        }
        .map_err(Error::unavailable)?;
        let hidden = config.head.hidden_size;
        let bert = BertModel::load(vb.pp("bert"), &config.bert).map_err(Error::unavailable)?;
        let pooler = candle_nn::linear(hidden, hidden, vb.pp("bert.pooler.dense"))
            .map_err(Error::unavailable)?;
        let head = candle_nn::linear(hidden, config.num_labels(), vb.pp("classifier"))
            .map_err(Error::unavailable)?;

        info!(
            labels = config.num_labels(),
            scoring = ?config.scoring(),
            max_positions = config.head.max_position_embeddings,
            "loaded sequence classifier"
        );
        Ok(Self {
            bert,
            pooler,
            head,
            config,
            tokenizer,
            device,
        })
    }

    fn probabilities(&self, ids: &[u32], mask: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = Tensor::new(mask, &self.device)?.unsqueeze(0)?;
        let xs = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        // [CLS] position
        let cls = xs.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        let logits = self.head.forward(&pooled)?;
        let scores = match self.config.scoring() {
            Scoring::Softmax => candle_nn::ops::softmax(&logits, D::Minus1)?,
            Scoring::Sigmoid => candle_nn::ops::sigmoid(&logits)?,
        };
        scores
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1()
    }
}

impl Classifier for BertSequenceClassifier {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let encoding = self.tokenizer.encode(text, true).map_err(Error::inference)?;
        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Err(Error::Inference("input produced no tokens".to_string()));
        }
        let limit = self.config.head.max_position_embeddings;
        if ids.len() > limit {
            return Err(Error::Inference(format!(
                "input is {} tokens, the model accepts at most {limit}",
                ids.len()
            )));
        }

        let scores = self
            .probabilities(ids, encoding.get_attention_mask())
            .map_err(Error::inference)?;
        let mut ranked: Vec<LabelScore> = scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| LabelScore {
                label: self.config.label(i),
                score,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixture;

    fn load_fixture() -> (tempfile::TempDir, BertSequenceClassifier) {
        let dir = fixture::tiny_bert();
        let model = BertSequenceClassifier::load_dir(dir.path(), Device::Cpu).unwrap();
        (dir, model)
    }

    #[test]
    fn scores_every_label_in_unit_interval() {
        let (_dir, model) = load_fixture();
        let ranked = model.classify("I love this!").unwrap();

        assert_eq!(ranked.len(), fixture::LABELS.len());
        for entry in &ranked {
            assert!(fixture::LABELS.contains(&entry.label.as_str()));
            assert!((0.0..=1.0).contains(&entry.score), "score {}", entry.score);
        }
        let total: f32 = ranked.iter().map(|e| e.score).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ranks_highest_score_first() {
        let (_dir, model) = load_fixture();
        let ranked = model.classify("the movie is ok").unwrap();
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn identical_text_gives_identical_output() {
        let (_dir, model) = load_fixture();
        let first = model.classify("I hate it").unwrap();
        let second = model.classify("I hate it").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_text_is_consistent() {
        let (_dir, model) = load_fixture();
        let first = model.classify("").map_err(|e| e.to_string());
        let second = model.classify("").map_err(|e| e.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_words_still_classify() {
        let (_dir, model) = load_fixture();
        assert!(model.classify("completely unseen vocabulary").is_ok());
    }

    #[test]
    fn over_long_input_is_an_inference_error() {
        let (_dir, model) = load_fixture();
        let text = vec!["love"; fixture::MAX_POSITIONS].join(" ");
        let err = model.classify(&text).unwrap_err();
        assert!(matches!(err, Error::Inference(_)), "{err}");
    }

    #[test]
    fn single_logit_head_scores_with_sigmoid() {
        let dir = fixture::tiny_bert_with(&["only"], None);
        let model = BertSequenceClassifier::load_dir(dir.path(), Device::Cpu).unwrap();

        for text in ["I love this!", "I hate it"] {
            let ranked = model.classify(text).unwrap();
            assert_eq!(ranked.len(), 1);
            assert_eq!(ranked[0].label, "only");
            let score = ranked[0].score;
            assert!(score > 0.0 && score < 1.0, "score {score} for {text:?}");
        }
    }

    #[test]
    fn multi_label_scores_each_label_independently() {
        let dir = fixture::tiny_bert_with(&fixture::LABELS, Some("multi_label_classification"));
        let model = BertSequenceClassifier::load_dir(dir.path(), Device::Cpu).unwrap();

        let ranked = model.classify("the movie is ok").unwrap();
        assert_eq!(ranked.len(), fixture::LABELS.len());
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        for entry in &ranked {
            assert!(entry.score > 0.0 && entry.score < 1.0, "score {}", entry.score);
        }
    }

    #[test]
    fn corrupt_weights_are_unavailable() {
        let dir = fixture::tiny_bert();
        std::fs::write(dir.path().join("model.safetensors"), b"not safetensors").unwrap();
        let err = BertSequenceClassifier::load_dir(dir.path(), Device::Cpu)
            .err()
            .unwrap();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }

    #[test]
    fn missing_tokenizer_is_unavailable() {
        let dir = fixture::tiny_bert();
        std::fs::remove_file(dir.path().join("tokenizer.json")).unwrap();
        assert!(matches!(
            BertSequenceClassifier::load_dir(dir.path(), Device::Cpu),
            Err(Error::ModelUnavailable(_))
        ));
    }
}
