// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! Chat API tests over the full router
//!
//! These tests verify that:
//! - POST /chat answers with the closest title and its distance
//! - Missing, null, empty and blank queries get the exact 400 contract body
//! - An absent or still-building index gets the exact 500 contract body
//! - Query validation wins over index state
//! - GET /health reports the index lifecycle phase and course count
//!
//! Everything runs against a `StubEmbedder`, so no model files are needed.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use coursechat::{
    api::{create_app, AppState},
    embed::{StubEmbedder, TextEmbedder},
    index::{FlatIndex, IndexState, LoadedIndex},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::util::ServiceExt; // for `oneshot`

const TITLES: [&str; 3] = [
    "Learn Python Programming",
    "Web Development with JavaScript",
    "Data Science Bootcamp",
];

/// Helper: AppState with a ready index over the fixed titles
async fn setup_ready_state() -> AppState {
    let embedder = StubEmbedder::default();
    let titles: Vec<String> = TITLES.iter().map(|t| t.to_string()).collect();
    let vectors = embedder.embed_batch(&titles).await.unwrap();
    let index = FlatIndex::from_vectors(embedder.dimension(), vectors).unwrap();
    let loaded = LoadedIndex::new(index, titles).unwrap();

    AppState::new(
        Arc::new(RwLock::new(IndexState::Ready(Arc::new(loaded)))),
        Arc::new(embedder),
    )
}

/// Helper: AppState in the given lifecycle phase, no index loaded
fn setup_state(state: IndexState) -> AppState {
    AppState::new(
        Arc::new(RwLock::new(state)),
        Arc::new(StubEmbedder::default()),
    )
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_exact_title_match() {
    let app = create_app(setup_ready_state().await);

    let response = app
        .oneshot(chat_request(r#"{"query": "Data Science Bootcamp"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["response"], "Data Science Bootcamp");
    assert!(json["distance"].as_f64().unwrap().abs() < 1e-5);
}

#[tokio::test]
async fn test_chat_answers_arbitrary_query() {
    let app = create_app(setup_ready_state().await);

    let response = app
        .oneshot(chat_request(r#"{"query": "how do I learn to code"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    // Some stored title comes back, with a real positive distance
    let answered = json["response"].as_str().unwrap();
    assert!(TITLES.contains(&answered));
    let distance = json["distance"].as_f64().unwrap();
    assert!(distance.is_finite());
    assert!(distance > 0.0);
}

#[tokio::test]
async fn test_chat_missing_query_field() {
    let app = create_app(setup_ready_state().await);

    let response = app.oneshot(chat_request(r#"{}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Query is required");
}

#[tokio::test]
async fn test_chat_null_query() {
    let app = create_app(setup_ready_state().await);

    let response = app
        .oneshot(chat_request(r#"{"query": null}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Query is required");
}

#[tokio::test]
async fn test_chat_empty_query() {
    let app = create_app(setup_ready_state().await);

    let response = app
        .oneshot(chat_request(r#"{"query": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Query is required");
}

#[tokio::test]
async fn test_chat_blank_query_rejected_when_index_absent() {
    // The 400 contract holds regardless of index state
    let app = create_app(setup_state(IndexState::Absent));

    let response = app
        .oneshot(chat_request(r#"{"query": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Query is required");
}

#[tokio::test]
async fn test_chat_absent_index() {
    let app = create_app(setup_state(IndexState::Absent));

    let response = app
        .oneshot(chat_request(r#"{"query": "python"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(
        json["error"],
        "Embeddings not found. Please regenerate embeddings."
    );
}

#[tokio::test]
async fn test_chat_building_index() {
    let app = create_app(setup_state(IndexState::Building));

    let response = app
        .oneshot(chat_request(r#"{"query": "python"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(
        json["error"],
        "Embeddings not found. Please regenerate embeddings."
    );
}

#[tokio::test]
async fn test_chat_rejects_get() {
    let app = create_app(setup_ready_state().await);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/chat")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_when_ready() {
    let app = create_app(setup_ready_state().await);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["index"], "ready");
    assert_eq!(json["courses"], TITLES.len());
}

#[tokio::test]
async fn test_health_when_absent() {
    let app = create_app(setup_state(IndexState::Absent));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "starting");
    assert_eq!(json["index"], "absent");
    assert_eq!(json["courses"], 0);
}
