// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! ONNX Runtime embedder for all-MiniLM-L6-v2
//!
//! Features:
//! - ONNX model loading from disk
//! - BERT tokenization with padding within a batch
//! - Mean pooling over token embeddings, weighted by attention mask
//! - 384-dimensional output vectors

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tokenizers::Tokenizer;
use tracing::info;

use super::{EmbedError, TextEmbedder};

/// Output dimension of all-MiniLM-L6-v2
const EMBEDDING_DIMENSION: usize = 384;

/// Maximum sequence length the model was trained with; the bundled
/// tokenizer.json truncates to this
const MAX_SEQUENCE_LENGTH: usize = 256;

/// ONNX-based embedder (all-MiniLM-L6-v2)
///
/// The model outputs token-level embeddings `[batch, seq_len, 384]`; mean
/// pooling over the sequence dimension, weighted by the attention mask,
/// yields one sentence vector per input.
///
/// # Thread Safety
/// The session sits behind `Arc<Mutex>` so the struct clones cheaply and
/// inference calls from concurrent handlers serialize on the lock.
#[derive(Clone)]
pub struct OnnxEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    dimension: usize,
    max_length: usize,
}

impl std::fmt::Debug for OnnxEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbedder")
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbedder {
    /// Load the model and tokenizer from disk
    ///
    /// Runs a probe inference to confirm the model emits token embeddings
    /// of the expected width, so a wrong model file fails here rather than
    /// on the first real request.
    pub async fn new<P: AsRef<Path>>(
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self, EmbedError> {
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            return Err(EmbedError::ModelNotFound(model_path.display().to_string()));
        }
        if !tokenizer_path.exists() {
            return Err(EmbedError::TokenizerLoad(format!(
                "file not found: {}",
                tokenizer_path.display()
            )));
        }

        info!("Loading ONNX embedding model from {}", model_path.display());

        let mut session = Session::builder()
            .and_then(|b| b.with_execution_providers([CPUExecutionProvider::default().build()]))
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(4))
            .and_then(|b| b.commit_from_file(model_path))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbedError::TokenizerLoad(e.to_string()))?;

        // Probe inference: confirm [batch, seq_len, 384] token embeddings.
        // Block scope so the borrowed outputs drop before session moves.
        {
            let encoding = tokenizer
                .encode("validation probe", true)
                .map_err(|e| EmbedError::Tokenize(e.to_string()))?;

            let seq_len = encoding.get_ids().len();
            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let token_type_ids = vec![0i64; seq_len];

            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(to_array(1, seq_len, input_ids)?)?,
                "attention_mask" => Value::from_array(to_array(1, seq_len, attention_mask)?)?,
                "token_type_ids" => Value::from_array(to_array(1, seq_len, token_type_ids)?)?
            ])?;

            let output = outputs[0].try_extract_array::<f32>()?;
            let shape = output.shape();
            if shape.len() != 3 || shape[2] != EMBEDDING_DIMENSION {
                return Err(EmbedError::OutputShape(format!(
                    "{:?} (expected [batch, seq_len, {}])",
                    shape, EMBEDDING_DIMENSION
                )));
            }
        }

        info!("ONNX embedding model ready, dimension {}", EMBEDDING_DIMENSION);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            dimension: EMBEDDING_DIMENSION,
            max_length: MAX_SEQUENCE_LENGTH,
        })
    }

    /// Tokenize a batch, pad to the longest sequence, run one inference,
    /// and mean-pool each item into a sentence vector
    fn run_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| EmbedError::Tokenize(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(texts.len() * max_len);
        let mut attention_mask = Vec::with_capacity(texts.len() * max_len);
        let mut token_type_ids = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let padding = max_len - ids.len();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            input_ids.extend(std::iter::repeat(0i64).take(padding));
            attention_mask.extend(mask.iter().map(|&m| m as i64));
            attention_mask.extend(std::iter::repeat(0i64).take(padding));
            token_type_ids.extend(std::iter::repeat(0i64).take(ids.len() + padding));
        }

        // Mean pooling needs the mask after the tensors consume these
        let mask_for_pooling = attention_mask.clone();

        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(to_array(texts.len(), max_len, input_ids)?)?,
            "attention_mask" => Value::from_array(to_array(texts.len(), max_len, attention_mask)?)?,
            "token_type_ids" => Value::from_array(to_array(texts.len(), max_len, token_type_ids)?)?
        ])?;

        let output = outputs[0].try_extract_array::<f32>()?;

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch_idx in 0..texts.len() {
            let item = output.index_axis(Axis(0), batch_idx);
            let seq_len = item.shape()[0];
            let hidden_dim = item.shape()[1];
            let item_mask = &mask_for_pooling[batch_idx * max_len..(batch_idx + 1) * max_len];

            let mut pooled = vec![0.0f32; hidden_dim];
            let mut sum_mask = 0.0f32;
            for i in 0..seq_len {
                let mask_value = item_mask[i] as f32;
                sum_mask += mask_value;
                for j in 0..hidden_dim {
                    pooled[j] += item[[i, j]] * mask_value;
                }
            }
            for value in &mut pooled {
                *value /= sum_mask.max(1e-9);
            }

            if pooled.len() != self.dimension {
                return Err(EmbedError::Dimension {
                    actual: pooled.len(),
                    expected: self.dimension,
                });
            }
            embeddings.push(pooled);
        }

        Ok(embeddings)
    }
}

/// Build a `[rows, cols]` i64 tensor from a flat vector
fn to_array(rows: usize, cols: usize, data: Vec<i64>) -> Result<Array2<i64>, EmbedError> {
    Array2::from_shape_vec((rows, cols), data)
        .map_err(|e| EmbedError::OutputShape(format!("input tensor: {}", e)))
}

#[async_trait]
impl TextEmbedder for OnnxEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        self.run_batch(texts)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut embeddings = self.run_batch(&[text.to_string()])?;
        embeddings
            .pop()
            .ok_or_else(|| EmbedError::OutputShape("inference returned no vectors".to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
