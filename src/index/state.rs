// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! Index lifecycle state
//!
//! Request handlers never check the filesystem; they consult a shared
//! [`IndexState`] that moves `Absent → Building → Ready` during startup and
//! stays `Ready` for the life of the process.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::flat::{FlatIndex, IndexError};

/// Shared handle to the index lifecycle state
pub type SharedIndexState = Arc<RwLock<IndexState>>;

/// An answer from the loaded index
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// The stored title closest to the query
    pub title: String,
    /// Euclidean distance between query and title vectors
    pub distance: f32,
}

/// A queryable index paired with its aligned titles
#[derive(Debug)]
pub struct LoadedIndex {
    index: FlatIndex,
    titles: Vec<String>,
}

impl LoadedIndex {
    /// Pair an index with its titles
    ///
    /// Returns `None` when the lengths differ; both producers (the store
    /// loader and the build pipeline) treat that as corruption.
    pub fn new(index: FlatIndex, titles: Vec<String>) -> Option<Self> {
        if index.len() != titles.len() {
            return None;
        }
        Some(Self { index, titles })
    }

    /// Number of indexed titles
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index holds no titles
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Vector width of the underlying index
    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// The indexed titles, in index order
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Answer a query vector with the closest title and its distance
    ///
    /// `Ok(None)` only for an empty index; construction guarantees the
    /// winning position has a title.
    pub fn answer(&self, query: &[f32]) -> Result<Option<Answer>, IndexError> {
        Ok(self.index.nearest(query)?.map(|hit| Answer {
            title: self.titles[hit.position].clone(),
            distance: hit.distance,
        }))
    }
}

/// Index lifecycle
#[derive(Debug, Clone, Default)]
pub enum IndexState {
    /// No persisted index exists yet
    #[default]
    Absent,
    /// The build pipeline is running
    Building,
    /// Index loaded and queryable
    Ready(Arc<LoadedIndex>),
}

impl IndexState {
    /// Lifecycle phase as a lowercase string, for health reporting
    pub fn name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Building => "building",
            Self::Ready(_) => "ready",
        }
    }

    /// The loaded index, when ready
    pub fn ready_index(&self) -> Option<Arc<LoadedIndex>> {
        match self {
            Self::Ready(index) => Some(Arc::clone(index)),
            _ => None,
        }
    }
}
