// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
//! Chat endpoint: free-text query in, closest course title out

pub mod handler;
pub mod request;
pub mod response;

pub use handler::chat_handler;
pub use request::ChatRequest;
pub use response::ChatResponse;
