// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! Startup pipeline
//!
//! Scrape → embed → persist → load. Runs to completion before the server
//! accepts requests; every failure is terminal, there is no retry or
//! partial startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::embed::TextEmbedder;
use crate::index::{FlatIndex, IndexState, IndexStore, LoadedIndex, SharedIndexState};
use crate::scrape::CatalogFetcher;

/// Scrape the catalog, embed every title, and persist the aligned pair
pub async fn build_index(
    config: &Config,
    embedder: &dyn TextEmbedder,
    store: &IndexStore,
) -> Result<()> {
    let fetcher = CatalogFetcher::new(config.fetch_timeout_secs);
    let titles = fetcher
        .fetch_titles(&config.courses_url, &config.courses_selector)
        .await
        .context("Failed to scrape course titles")?;

    info!("Embedding {} course titles", titles.len());
    let vectors = embedder
        .embed_batch(&titles)
        .await
        .context("Failed to embed course titles")?;

    let index = FlatIndex::from_vectors(embedder.dimension(), vectors)
        .context("Failed to assemble vector index")?;

    store
        .save(&index, &titles)
        .await
        .context("Failed to persist index")?;

    Ok(())
}

/// Bring the shared state to `Ready`
///
/// Loads the persisted index when one exists; otherwise marks the state
/// `Building`, runs [`build_index`], and loads the result. The post-build
/// reload goes through the same loader as a warm start, so what the
/// handlers serve is always what a future restart would read.
pub async fn ensure_ready(
    config: &Config,
    embedder: &dyn TextEmbedder,
    store: &IndexStore,
    state: &SharedIndexState,
) -> Result<()> {
    if let Some((index, titles)) = store
        .load()
        .await
        .context("Failed to load persisted index")?
    {
        let loaded = LoadedIndex::new(index, titles)
            .context("Persisted index and metadata have different lengths")?;
        info!("Using persisted index ({} titles)", loaded.len());
        *state.write().await = IndexState::Ready(Arc::new(loaded));
        return Ok(());
    }

    info!(
        "No persisted index found, building from {}",
        config.courses_url
    );
    *state.write().await = IndexState::Building;

    build_index(config, embedder, store).await?;

    let (index, titles) = store
        .load()
        .await
        .context("Failed to reload index after build")?
        .context("Index file missing immediately after build")?;
    let loaded = LoadedIndex::new(index, titles)
        .context("Rebuilt index and metadata have different lengths")?;
    info!("Index ready ({} titles)", loaded.len());
    *state.write().await = IndexState::Ready(Arc::new(loaded));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::StubEmbedder;
    use tempfile::TempDir;
    use tokio::sync::RwLock;

    fn test_config(data_dir: &std::path::Path, url: &str) -> Config {
        Config {
            courses_url: url.to_string(),
            data_dir: data_dir.to_path_buf(),
            fetch_timeout_secs: 2,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_ensure_ready_uses_persisted_index() {
        let temp_dir = TempDir::new().unwrap();
        let embedder = StubEmbedder::default();
        let store = IndexStore::new(temp_dir.path());

        let titles = vec![
            "Learn Python Programming".to_string(),
            "Data Science Bootcamp".to_string(),
        ];
        let vectors = embedder.embed_batch(&titles).await.unwrap();
        let index = FlatIndex::from_vectors(embedder.dimension(), vectors).unwrap();
        store.save(&index, &titles).await.unwrap();

        // Unroutable URL: a warm start must never touch the network
        let config = test_config(temp_dir.path(), "http://127.0.0.1:1/courses");
        let state: SharedIndexState = Arc::new(RwLock::new(IndexState::Absent));

        ensure_ready(&config, &embedder, &store, &state)
            .await
            .unwrap();

        let guard = state.read().await;
        let loaded = guard.ready_index().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_ready_fetch_failure_is_terminal() {
        let temp_dir = TempDir::new().unwrap();
        let embedder = StubEmbedder::default();
        let store = IndexStore::new(temp_dir.path());

        // Nothing listens on port 1; the build must fail fast
        let config = test_config(temp_dir.path(), "http://127.0.0.1:1/courses");
        let state: SharedIndexState = Arc::new(RwLock::new(IndexState::Absent));

        let result = ensure_ready(&config, &embedder, &store, &state).await;
        assert!(result.is_err());

        // A failed build leaves nothing behind on disk
        assert!(!store.exists());
        assert!(!store.metadata_path().exists());
        assert!(state.read().await.ready_index().is_none());
    }
}
