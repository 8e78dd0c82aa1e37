//! A tiny random-weight BERT checkpoint written to a temp directory.

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

use super::source::{CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE};

pub const LABELS: [&str; 3] = ["negative", "neutral", "positive"];
pub const HIDDEN: usize = 8;
pub const MAX_POSITIONS: usize = 16;

const VOCAB: [&str; 14] = [
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "i", "love", "this", "!", "hate", "it", "is", "ok",
    "the", "movie",
];

pub fn config_json() -> Value {
    config_json_for(&LABELS, None)
}

pub fn config_json_for(labels: &[&str], problem_type: Option<&str>) -> Value {
    let id2label: serde_json::Map<String, Value> = labels
        .iter()
        .enumerate()
        .map(|(id, label)| (id.to_string(), json!(label)))
        .collect();
    let label2id: serde_json::Map<String, Value> = labels
        .iter()
        .enumerate()
        .map(|(id, label)| (label.to_string(), json!(id)))
        .collect();
    let mut config = json!({
        "architectures": ["BertForSequenceClassification"],
        "model_type": "bert",
        "vocab_size": VOCAB.len(),
        "hidden_size": HIDDEN,
        "num_hidden_layers": 1,
        "num_attention_heads": 2,
        "intermediate_size": 16,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.1,
        "max_position_embeddings": MAX_POSITIONS,
        "type_vocab_size": 2,
        "initializer_range": 0.02,
        "layer_norm_eps": 1e-12,
        "pad_token_id": 0,
        "classifier_dropout": null,
        "id2label": id2label,
        "label2id": label2id
    });
    if let Some(problem_type) = problem_type {
        config["problem_type"] = json!(problem_type);
    }
    config
}

fn tokenizer_json() -> Value {
    let vocab: serde_json::Map<String, Value> = VOCAB
        .iter()
        .enumerate()
        .map(|(id, token)| (token.to_string(), json!(id)))
        .collect();
    json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": { "type": "Lowercase" },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": {
            "type": "BertProcessing",
            "sep": ["[SEP]", 3],
            "cls": ["[CLS]", 2]
        },
        "decoder": null,
        "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]" }
    })
}

pub fn tiny_bert() -> TempDir {
    tiny_bert_with(&LABELS, None)
}

pub fn tiny_bert_with(labels: &[&str], problem_type: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config = config_json_for(labels, problem_type);
    std::fs::write(dir.path().join(CONFIG_FILE), config.to_string()).unwrap();
    std::fs::write(dir.path().join(TOKENIZER_FILE), tokenizer_json().to_string()).unwrap();

    let bert_config: BertConfig = serde_json::from_value(config).unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    BertModel::load(vb.pp("bert"), &bert_config).unwrap();
    candle_nn::linear(HIDDEN, HIDDEN, vb.pp("bert.pooler.dense")).unwrap();
    candle_nn::linear(HIDDEN, labels.len(), vb.pp("classifier")).unwrap();
    varmap.save(dir.path().join(WEIGHTS_FILE)).unwrap();
    dir
}
