// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
//! Chat API response types

use serde::{Deserialize, Serialize};

/// Response body for POST /chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    /// The closest-matching course title
    pub response: String,
    /// Euclidean distance between the query and the match
    pub distance: f32,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>, distance: f32) -> Self {
        Self {
            response: response.into(),
            distance,
        }
    }
}
