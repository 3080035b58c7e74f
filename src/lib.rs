// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
pub mod api;
pub mod config;
pub mod embed;
pub mod index;
pub mod pipeline;
pub mod scrape;

// Re-export the types most callers wire together at startup
pub use api::{create_app, start_server, AppState};
pub use config::Config;
pub use embed::{EmbedError, OnnxEmbedder, StubEmbedder, TextEmbedder};
pub use index::{
    Answer, FlatIndex, IndexError, IndexState, IndexStore, LoadedIndex, SharedIndexState,
    StoreError,
};
pub use pipeline::{build_index, ensure_ready};
pub use scrape::{CatalogFetcher, ScrapeError};
