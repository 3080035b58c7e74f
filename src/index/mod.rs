// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT

//! Course vector index
//!
//! Flat exact L2 search over index-aligned title vectors, persisted to
//! disk as a binary index file plus a JSON titles file, with an explicit
//! lifecycle state shared with the request handlers.

pub mod flat;
pub mod state;
pub mod store;

pub use flat::{FlatIndex, IndexError, Nearest};
pub use state::{Answer, IndexState, LoadedIndex, SharedIndexState};
pub use store::{IndexStore, StoreError, INDEX_FILE, METADATA_FILE};
