// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! Deterministic stand-in embedder
//!
//! Maps each text to a pseudo-random unit vector seeded by its hash. Equal
//! texts always produce equal vectors, so nearest-neighbor behavior (exact
//! self-match at distance zero included) is testable without the ONNX model
//! on disk.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::{EmbedError, TextEmbedder};

/// Hash-seeded deterministic embedder
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    /// Create a stub embedder producing vectors of `dimension`
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        let mut current_seed = seed;
        for i in 0..self.dimension {
            // Linear congruential step, perturbed by position
            current_seed =
                (current_seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        // Same width as all-MiniLM-L6-v2 so stub-built indexes match the
        // production layout
        Self::new(384)
    }
}

#[async_trait]
impl TextEmbedder for StubEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.generate(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
