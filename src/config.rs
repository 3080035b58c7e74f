// Copyright (c) 2025 Coursechat
// SPDX-License-Identifier: MIT
//! Service configuration loaded from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use scraper::Selector;
use url::Url;

/// Runtime configuration for the catalog QA service
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog page scraped for course titles
    pub courses_url: String,
    /// CSS selector matching one title element per course card
    pub courses_selector: String,
    /// Address the HTTP server binds to (ip:port)
    pub listen_addr: String,
    /// Directory holding the persisted index and metadata files
    pub data_dir: PathBuf,
    /// Path to the all-MiniLM-L6-v2 ONNX model
    pub model_path: PathBuf,
    /// Path to the matching tokenizer.json
    pub tokenizer_path: PathBuf,
    /// Page fetch timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            courses_url: env::var("COURSES_URL")
                .unwrap_or_else(|_| "https://brainlox.com/courses/category/technical".to_string()),
            courses_selector: env::var("COURSES_SELECTOR")
                .unwrap_or_else(|_| "div.course-card-title".to_string()),
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            model_path: env::var("EMBED_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models/all-MiniLM-L6-v2-onnx/model.onnx")),
            tokenizer_path: env::var("EMBED_TOKENIZER_PATH").map(PathBuf::from).unwrap_or_else(
                |_| PathBuf::from("./models/all-MiniLM-L6-v2-onnx/tokenizer.json"),
            ),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Validate the configuration
    ///
    /// Catches malformed URLs, selectors, and addresses at startup rather
    /// than midway through the build pipeline.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.courses_url)
            .map_err(|e| format!("COURSES_URL is not a valid URL: {}", e))?;
        if !["http", "https"].contains(&url.scheme()) {
            return Err(format!(
                "COURSES_URL must use http or https, got: {}",
                url.scheme()
            ));
        }
        if Selector::parse(&self.courses_selector).is_err() {
            return Err(format!(
                "COURSES_SELECTOR is not a valid CSS selector: {}",
                self.courses_selector
            ));
        }
        self.listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("LISTEN_ADDR is not a valid socket address: {}", e))?;
        if self.fetch_timeout_secs == 0 {
            return Err("Fetch timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            courses_url: "https://brainlox.com/courses/category/technical".to_string(),
            courses_selector: "div.course-card-title".to_string(),
            listen_addr: "127.0.0.1:5000".to_string(),
            data_dir: PathBuf::from("."),
            model_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/model.onnx"),
            tokenizer_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/tokenizer.json"),
            fetch_timeout_secs: 30,
        }
    }
}
