// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! Text embedding
//!
//! One trait, two implementations: [`OnnxEmbedder`] runs the
//! all-MiniLM-L6-v2 sentence transformer through ONNX Runtime, and
//! [`StubEmbedder`] produces deterministic vectors so everything above this
//! module can be exercised without model files on disk.

pub mod onnx;
pub mod stub;

pub use onnx::OnnxEmbedder;
pub use stub::StubEmbedder;

use async_trait::async_trait;
use thiserror::Error;

/// Embedding error types
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Batch embed called with no texts
    #[error("Embedding input is empty")]
    EmptyInput,
    /// Model file missing at the configured path
    #[error("Model file not found: {0}")]
    ModelNotFound(String),
    /// Tokenizer file missing or unreadable
    #[error("Failed to load tokenizer: {0}")]
    TokenizerLoad(String),
    /// Tokenization failed for an input text
    #[error("Tokenization failed: {0}")]
    Tokenize(String),
    /// ONNX Runtime failure (session build or inference)
    #[error("ONNX runtime error: {0}")]
    Onnx(#[from] ort::Error),
    /// Model emitted a tensor with an unexpected shape
    #[error("Model output has unexpected shape: {0}")]
    OutputShape(String),
    /// Produced vector has the wrong dimension
    #[error("Unexpected embedding dimension: {actual} (expected {expected})")]
    Dimension { actual: usize, expected: usize },
}

/// Sentence embedding interface
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector, which is what makes persisted indexes reusable across runs.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts
    ///
    /// Returns one vector per input, in input order. An empty batch is
    /// rejected with [`EmbedError::EmptyInput`].
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Output dimension of the produced vectors
    fn dimension(&self) -> usize;
}
