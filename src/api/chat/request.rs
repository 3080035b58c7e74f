// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
//! Chat API request types

use serde::{Deserialize, Serialize};

/// Request body for POST /chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-text question to match against the catalog. Absent, null and
    /// blank all count as missing.
    #[serde(default)]
    pub query: Option<String>,
}

impl ChatRequest {
    /// The query text, if the request carries a usable one
    ///
    /// Blankness is judged on the trimmed string, but the text returned is
    /// the original, untouched query; what the client sent is what gets
    /// embedded.
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }
}
