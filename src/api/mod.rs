// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
pub mod chat;
pub mod errors;
pub mod http_server;

pub use chat::{chat_handler, ChatRequest, ChatResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
