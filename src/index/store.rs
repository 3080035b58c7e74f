// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! On-disk persistence for the course index
//!
//! Two files in the data directory: a bincode dump of the [`FlatIndex`] and
//! a JSON array of the titles it was built from, index-aligned. Each file is
//! written atomically (temp file, fsync, rename), and the metadata file
//! lands before the index file. The index file is the readiness marker:
//! every crash point therefore reads back as "absent", never as a
//! misaligned pair.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::flat::FlatIndex;

/// Binary index file name, fixed alongside the metadata file
pub const INDEX_FILE: &str = "courses_index.bin";
/// JSON titles file name
pub const METADATA_FILE: &str = "courses_metadata.json";

/// Persistence error types
///
/// Absence of the index is not among them: [`IndexStore::load`] reports it
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Index could not be encoded for writing
    #[error("Failed to encode index: {0}")]
    EncodeIndex(String),
    /// Index file exists but its bytes do not decode
    #[error("Failed to decode index file: {0}")]
    DecodeIndex(String),
    /// Metadata file unreadable or not a JSON string array
    #[error("Failed to read metadata: {0}")]
    Metadata(String),
    /// Refusing to persist a vector/title pair of different lengths
    #[error("Refusing to persist misaligned data: {vectors} vectors, {titles} titles")]
    LengthMismatch { vectors: usize, titles: usize },
    /// Persisted files disagree on length; rebuilding is the only fix
    #[error("Persisted index is misaligned: {vectors} vectors, {titles} titles")]
    Misaligned { vectors: usize, titles: usize },
}

/// File-based index persistence
pub struct IndexStore {
    data_dir: PathBuf,
}

impl IndexStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the binary index file
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE)
    }

    /// Path of the JSON metadata file
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(METADATA_FILE)
    }

    /// Whether a persisted index is present
    pub fn exists(&self) -> bool {
        self.index_path().exists()
    }

    /// Persist an index and its aligned titles
    ///
    /// Rejects inputs of different lengths before touching the disk;
    /// the alignment invariant must hold on every persisted pair.
    pub async fn save(&self, index: &FlatIndex, titles: &[String]) -> Result<(), StoreError> {
        if index.len() != titles.len() {
            return Err(StoreError::LengthMismatch {
                vectors: index.len(),
                titles: titles.len(),
            });
        }

        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).await?;
        }

        let metadata_json = serde_json::to_string_pretty(titles)
            .map_err(|e| StoreError::Metadata(e.to_string()))?;
        let index_bytes =
            bincode::serialize(index).map_err(|e| StoreError::EncodeIndex(e.to_string()))?;

        // Metadata first; the index file rename is the commit point
        write_atomic(&self.metadata_path(), metadata_json.as_bytes()).await?;
        write_atomic(&self.index_path(), &index_bytes).await?;

        info!(
            "Persisted index of {} vectors to {}",
            index.len(),
            self.data_dir.display()
        );

        Ok(())
    }

    /// Load the persisted index and titles
    ///
    /// Returns `Ok(None)` when no index file exists (the normal
    /// not-yet-built state). Decode failures and a vector/title count
    /// mismatch are hard errors.
    pub async fn load(&self) -> Result<Option<(FlatIndex, Vec<String>)>, StoreError> {
        let index_path = self.index_path();
        if !index_path.exists() {
            return Ok(None);
        }

        let index_bytes = fs::read(&index_path).await?;
        let index: FlatIndex = bincode::deserialize(&index_bytes)
            .map_err(|e| StoreError::DecodeIndex(e.to_string()))?;
        if index.dimension() == 0 {
            return Err(StoreError::DecodeIndex(
                "index has dimension 0".to_string(),
            ));
        }

        let metadata_json = fs::read_to_string(&self.metadata_path())
            .await
            .map_err(|e| StoreError::Metadata(e.to_string()))?;
        let titles: Vec<String> = serde_json::from_str(&metadata_json)
            .map_err(|e| StoreError::Metadata(e.to_string()))?;

        if index.len() != titles.len() {
            return Err(StoreError::Misaligned {
                vectors: index.len(),
                titles: titles.len(),
            });
        }

        info!(
            "Loaded index of {} vectors from {}",
            index.len(),
            self.data_dir.display()
        );

        Ok(Some((index, titles)))
    }
}

/// Write bytes to `path` via a temp file in the same directory
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    fs::rename(temp_path, path).await?;
    Ok(())
}
