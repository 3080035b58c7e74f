//! HTTP fetching of the course catalog page
//!
//! One page, one GET. Failures are terminal for the index build; there is
//! no retry layer.

use std::time::Duration;

use reqwest::Client;
use scraper::Selector;
use thiserror::Error;
use tracing::{debug, info};

use super::extractor::extract_titles;

/// Catalog scrape error types
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(String),
    /// HTTP non-success status
    #[error("HTTP {status} for: {url}")]
    HttpStatus { status: u16, url: String },
    /// Selector matched no elements on the page
    #[error("No elements matched selector `{selector}` at: {url}")]
    NoContent { selector: String, url: String },
    /// Selector string failed to parse
    #[error("Invalid CSS selector: {0}")]
    Selector(String),
}

/// Fetches the catalog page and extracts course titles
pub struct CatalogFetcher {
    client: Client,
}

impl CatalogFetcher {
    /// Create a new catalog fetcher with the given request timeout
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("Mozilla/5.0 (compatible; CoursechatBot/1.0)")
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the catalog page and return the titles matched by `selector`,
    /// in document order
    pub async fn fetch_titles(
        &self,
        url: &str,
        selector: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let html = self.fetch_page(url).await?;

        let parsed = Selector::parse(selector)
            .map_err(|_| ScrapeError::Selector(selector.to_string()))?;
        let titles = extract_titles(&html, &parsed);

        if titles.is_empty() {
            return Err(ScrapeError::NoContent {
                selector: selector.to_string(),
                url: url.to_string(),
            });
        }

        info!("Extracted {} course titles from: {}", titles.len(), url);

        Ok(titles)
    }

    /// Fetch raw HTML from the catalog URL
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching catalog page: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Timeout(url.to_string())
            } else {
                ScrapeError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::Http(e.to_string()))
    }
}
