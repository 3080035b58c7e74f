//! Course title extraction from catalog HTML
//!
//! Selects title elements with a CSS selector and normalizes their text.

use scraper::{Html, Selector};

/// Extract course titles from catalog HTML
///
/// Returns the whitespace-normalized text of every element matching
/// `selector`, in document order. Position in the returned vector is the
/// title's identity for the rest of the pipeline, so no deduplication or
/// reordering happens here.
pub fn extract_titles(html: &str, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
        .collect()
}

/// Normalize whitespace inside an extracted title
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
