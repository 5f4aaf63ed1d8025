//! Small helpers over `scraper` shared by the HTML sources

use scraper::{ElementRef, Selector};

use crate::error::SourceError;

/// Parse a CSS selector, reporting failure against the page being read
pub fn selector(url: &str, css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::structure(url, &format!("bad selector {}: {}", css, e)))
}

/// Text nodes trimmed, empty pieces dropped, joined with `sep`
pub fn element_text(el: &ElementRef, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
