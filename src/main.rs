// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
use std::{env, sync::Arc};

use anyhow::{Context, Result};
use tokio::sync::RwLock;

use coursechat::{
    api::{start_server, AppState},
    config::Config,
    embed::OnnxEmbedder,
    index::{IndexState, IndexStore, SharedIndexState},
    pipeline,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting coursechat...");

    let config = Config::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let embedder = Arc::new(
        OnnxEmbedder::new(&config.model_path, &config.tokenizer_path)
            .await
            .context("Failed to load embedding model")?,
    );
    println!("✅ Embedding model loaded");

    let store = IndexStore::new(&config.data_dir);
    let state: SharedIndexState = Arc::new(RwLock::new(IndexState::Absent));

    // Build or load synchronously; the server only starts serving once the
    // index is ready, and any failure here terminates the process
    pipeline::ensure_ready(&config, embedder.as_ref(), &store, &state)
        .await
        .context("Startup pipeline failed")?;
    println!("✅ Course index ready");

    let app_state = AppState::new(state, embedder);
    start_server(&config.listen_addr, app_state).await
}
