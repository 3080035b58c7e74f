//! Course catalog scraping
//!
//! Fetches the catalog page and extracts one title per course card.
//!
//! ## Architecture
//!
//! ```text
//! Catalog URL → CatalogFetcher → HTML → extract_titles → Vec<String>
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let fetcher = CatalogFetcher::new(30);
//! let titles = fetcher
//!     .fetch_titles("https://brainlox.com/courses/category/technical", "div.course-card-title")
//!     .await?;
//! ```

pub mod extractor;
pub mod fetcher;

pub use extractor::extract_titles;
pub use fetcher::{CatalogFetcher, ScrapeError};
