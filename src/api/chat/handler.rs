// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
//! Chat endpoint handler

use axum::{extract::State, Json};
use tracing::{debug, info, warn};

use super::request::ChatRequest;
use super::response::ChatResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /chat - Answer a free-text query with the closest course title
///
/// # Request
/// - `query`: question text (required)
///
/// # Response
/// - `response`: closest-matching course title
/// - `distance`: Euclidean distance between query and match
///
/// # Errors
/// - 400 Bad Request: query missing or blank
/// - 500 Internal Server Error: index absent/building, or embedding failed
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    // Query validation comes first: a bad request is a bad request no
    // matter what state the index is in
    let query = match request.query_text() {
        Some(query) => query,
        None => {
            warn!("Chat request rejected: missing or blank query");
            return Err(ApiError::MissingQuery);
        }
    };

    debug!("Chat query: {:?}", query);

    let loaded = {
        let guard = state.index.read().await;
        guard.ready_index().ok_or(ApiError::IndexUnavailable)?
    };

    let query_vector = state
        .embedder
        .embed_query(query)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let answer = loaded
        .answer(&query_vector)
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::IndexUnavailable)?;

    info!(
        "Answered chat query with '{}' (distance {:.4})",
        answer.title, answer.distance
    );

    Ok(Json(ChatResponse::new(answer.title, answer.distance)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::{StubEmbedder, TextEmbedder};
    use crate::index::{FlatIndex, IndexState, LoadedIndex};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    async fn ready_state(titles: &[&str]) -> AppState {
        let embedder = StubEmbedder::default();
        let titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
        let vectors = embedder.embed_batch(&titles).await.unwrap();
        let index = FlatIndex::from_vectors(embedder.dimension(), vectors).unwrap();
        let loaded = LoadedIndex::new(index, titles).unwrap();

        AppState {
            index: Arc::new(RwLock::new(IndexState::Ready(Arc::new(loaded)))),
            embedder: Arc::new(embedder),
        }
    }

    fn absent_state() -> AppState {
        AppState {
            index: Arc::new(RwLock::new(IndexState::Absent)),
            embedder: Arc::new(StubEmbedder::default()),
        }
    }

    #[tokio::test]
    async fn test_self_match_has_zero_distance() {
        let state = ready_state(&["Learn Python Programming", "Data Science Bootcamp"]).await;
        let request = ChatRequest {
            query: Some("Data Science Bootcamp".to_string()),
        };

        let Json(response) = chat_handler(State(state), Json(request)).await.unwrap();
        assert_eq!(response.response, "Data Science Bootcamp");
        assert!(response.distance.abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_missing_query_rejected_even_when_ready() {
        let state = ready_state(&["Learn Python Programming"]).await;
        let request = ChatRequest { query: None };

        let err = chat_handler(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingQuery));
    }

    #[tokio::test]
    async fn test_absent_index_is_unavailable() {
        let request = ChatRequest {
            query: Some("anything".to_string()),
        };

        let err = chat_handler(State(absent_state()), Json(request))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::IndexUnavailable));
    }

    #[tokio::test]
    async fn test_building_index_is_unavailable() {
        let state = AppState {
            index: Arc::new(RwLock::new(IndexState::Building)),
            embedder: Arc::new(StubEmbedder::default()),
        };
        let request = ChatRequest {
            query: Some("anything".to_string()),
        };

        let err = chat_handler(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, ApiError::IndexUnavailable));
    }

    #[tokio::test]
    async fn test_blank_query_beats_absent_index() {
        // 400 wins over 500 when both conditions hold
        let request = ChatRequest {
            query: Some("   ".to_string()),
        };

        let err = chat_handler(State(absent_state()), Json(request))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingQuery));
    }
}
