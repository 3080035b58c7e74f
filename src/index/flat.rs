// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! Exact nearest-neighbor index over course title vectors
//!
//! A flat store of index-aligned vectors searched by linear scan under
//! Euclidean (L2) distance. The catalog holds tens of titles, so exact
//! search wins on both simplicity and accuracy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index error types
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    /// Vector width does not match the index
    #[error("Invalid vector dimensions: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
    /// Vector contains NaN or Infinity, which would poison every distance
    #[error("Invalid vector values: contains NaN or Infinity")]
    NonFinite,
}

/// Nearest-neighbor hit
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest {
    /// Position of the winning vector, in insertion order
    pub position: usize,
    /// Euclidean distance between the query and the winner
    pub distance: f32,
}

/// Flat exact L2 nearest-neighbor index
///
/// Positions are insertion order and never change; the caller keeps its
/// metadata aligned by that position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index for vectors of `dimension`
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Build an index from a batch of vectors, validating each
    pub fn from_vectors(dimension: usize, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        let mut index = Self::with_dimension(dimension);
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    /// Append a vector
    pub fn add(&mut self, vector: Vec<f32>) -> Result<(), IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::Dimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|v| v.is_nan() || v.is_infinite()) {
            return Err(IndexError::NonFinite);
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector width this index was built for
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Find the stored vector closest to `query`
    ///
    /// Linear scan comparing squared distances; the square root is applied
    /// only to the winner. Exact ties keep the earliest position, so the
    /// result is deterministic across runs.
    pub fn nearest(&self, query: &[f32]) -> Result<Option<Nearest>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::Dimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut best: Option<(usize, f32)> = None;
        for (position, vector) in self.vectors.iter().enumerate() {
            let distance_sq = squared_l2(query, vector);
            let replace = match best {
                Some((_, best_sq)) => distance_sq < best_sq,
                None => true,
            };
            if replace {
                best = Some((position, distance_sq));
            }
        }

        Ok(best.map(|(position, distance_sq)| Nearest {
            position,
            distance: distance_sq.sqrt(),
        }))
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
