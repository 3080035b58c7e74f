// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error body on the wire: `{"error": "<message>"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Chat API error
///
/// The two fixed messages are client contract; clients match on them
/// verbatim, so they must never be reworded.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Request carried no usable query string
    MissingQuery,
    /// Index is absent or still building
    IndexUnavailable,
    /// Embedding or search failed at request time
    Internal(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::MissingQuery => "Query is required".to_string(),
            ApiError::IndexUnavailable => {
                "Embeddings not found. Please regenerate embeddings.".to_string()
            }
            ApiError::Internal(msg) => msg.clone(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery => StatusCode::BAD_REQUEST,
            ApiError::IndexUnavailable | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
