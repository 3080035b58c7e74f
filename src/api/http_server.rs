// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
//! HTTP server wiring
//!
//! Builds the router, carries the shared state, and serves until ctrl-c.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::chat::chat_handler;
use crate::embed::TextEmbedder;
use crate::index::SharedIndexState;

/// Shared state behind every handler
///
/// The index handle and the embedder are both constructed once at startup;
/// handlers never touch the filesystem or reload the model.
#[derive(Clone)]
pub struct AppState {
    /// Index lifecycle cell, `Ready` after a successful startup
    pub index: SharedIndexState,
    /// Embedder used for query vectors
    pub embedder: Arc<dyn TextEmbedder>,
}

impl AppState {
    pub fn new(index: SharedIndexState, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { index, embedder }
    }
}

/// Health report for GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" once serving answers, "starting" before that
    pub status: String,
    /// Index lifecycle phase: "absent", "building" or "ready"
    pub index: String,
    /// Number of indexed course titles
    pub courses: usize,
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind `addr` and serve until ctrl-c
pub async fn start_server(addr: &str, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let guard = state.index.read().await;
    let courses = guard.ready_index().map(|index| index.len()).unwrap_or(0);
    let status = if guard.ready_index().is_some() {
        "ok"
    } else {
        "starting"
    };

    Json(HealthResponse {
        status: status.to_string(),
        index: guard.name().to_string(),
        courses,
    })
}
