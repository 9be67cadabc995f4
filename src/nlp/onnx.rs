//! BERT token-classification recognizer on ONNX Runtime.
//!
//! Expects a directory holding an ONNX export of a CoNLL-03 NER model such as
//! `dslim/bert-base-NER`:
//!
//! - `model.onnx` with `input_ids`, `attention_mask` and optional
//!   `token_type_ids` inputs and a `[batch, seq, labels]` logits output
//! - `tokenizer.json` for the matching WordPiece tokenizer
//! - `config.json` with `id2label` and `max_position_embeddings`

use std::{collections::HashMap, fmt::Display, path::Path, sync::Mutex};

use anyhow::{anyhow, Context, Result};
use ndarray::{Array2, CowArray, Ix3, IxDyn};
use ort::{
    tensor::OrtOwnedTensor, Environment, GraphOptimizationLevel, Session, SessionBuilder, Value,
};
use serde::Deserialize;
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info};

use crate::{
    error::NerError,
    nlp::{
        grouping::{self, TokenPrediction},
        ner::{Ner, Span},
    },
};

const DEFAULT_MAX_POSITIONS: usize = 512;

#[derive(Debug, Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
    max_position_embeddings: Option<usize>,
}

pub struct OnnxNer {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    max_positions: usize,
}

impl OnnxNer {
    /// Load model, tokenizer and label map from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let model_path = dir.join("model.onnx");
        let tokenizer_path = dir.join("tokenizer.json");
        let config_path = dir.join("config.json");

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("loading tokenizer {}: {e}", tokenizer_path.display()))?;

        let config: ModelConfig = serde_json::from_str(
            &std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?,
        )
        .with_context(|| format!("parsing {}", config_path.display()))?;
        let labels = grouping::label_table(&config.id2label);
        let max_positions = config
            .max_position_embeddings
            .unwrap_or(DEFAULT_MAX_POSITIONS);

        let environment = Environment::builder()
            .with_name("entity-augment")
            .build()?
            .into_arc();
        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .with_model_from_file(&model_path)
            .with_context(|| format!("loading {}", model_path.display()))?;

        info!(
            path = %dir.display(),
            labels = labels.len(),
            max_positions,
            "loaded onnx ner model"
        );
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            max_positions,
        })
    }

    fn predict_tokens(&self, encoding: &Encoding) -> Result<Vec<TokenPrediction>, NerError> {
        let seq_len = encoding.get_ids().len();
        let ids = as_batch(encoding.get_ids(), seq_len)?;
        let mask = as_batch(encoding.get_attention_mask(), seq_len)?;
        let type_ids = as_batch(encoding.get_type_ids(), seq_len)?;

        let session = self.session.lock().map_err(inference)?;
        let mut inputs = Vec::with_capacity(session.inputs.len());
        for input in &session.inputs {
            let array = match input.name.as_str() {
                "input_ids" => &ids,
                "attention_mask" => &mask,
                "token_type_ids" => &type_ids,
                other => return Err(NerError::Inference(format!("unsupported input {other}"))),
            };
            inputs.push(Value::from_array(session.allocator(), array).map_err(inference)?);
        }
        let outputs = session.run(inputs).map_err(inference)?;
        let output = outputs
            .first()
            .ok_or_else(|| NerError::Output("model produced no outputs".into()))?;
        let logits: OrtOwnedTensor<f32, _> = output.try_extract().map_err(inference)?;
        let logits = logits
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|e| NerError::Output(e.to_string()))?;
        let (batch, positions, num_labels) = logits.dim();
        if batch != 1 || positions != seq_len {
            return Err(NerError::Output(format!(
                "unexpected logits shape {:?}",
                logits.shape()
            )));
        }

        let special = encoding.get_special_tokens_mask();
        let offsets = encoding.get_offsets();
        let mut tokens = Vec::with_capacity(seq_len);
        for idx in 0..seq_len {
            let (start, end) = offsets[idx];
            if special[idx] == 1 || start == end {
                continue;
            }
            let row: Vec<f32> = (0..num_labels).map(|label| logits[[0, idx, label]]).collect();
            let Some((label_idx, score)) = grouping::argmax_softmax(&row) else {
                continue;
            };
            let label = self
                .labels
                .get(label_idx)
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{label_idx}"));
            tokens.push(TokenPrediction {
                start,
                end,
                label,
                score,
            });
        }
        Ok(tokens)
    }
}

impl Ner for OnnxNer {
    fn extract(&self, text: &str) -> Result<Vec<Span>, NerError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| NerError::Tokenize(e.to_string()))?;
        let tokens = encoding.get_ids().len();
        if tokens > self.max_positions {
            return Err(NerError::InputTooLong {
                tokens,
                max: self.max_positions,
            });
        }
        let predictions = self.predict_tokens(&encoding)?;
        let spans = grouping::group_entities(text, &predictions);
        debug!(tokens, spans = spans.len(), "onnx ner");
        Ok(spans)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

fn as_batch(values: &[u32], seq_len: usize) -> Result<CowArray<'static, i64, IxDyn>, NerError> {
    let values: Vec<i64> = values.iter().map(|&v| i64::from(v)).collect();
    let array = Array2::from_shape_vec((1, seq_len), values).map_err(inference)?;
    Ok(CowArray::from(array.into_dyn()))
}

fn inference<E: Display>(err: E) -> NerError {
    NerError::Inference(err.to_string())
}
