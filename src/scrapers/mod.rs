//! Page extractors for the three kinds of page the pipeline visits.
//!
//! Every structural assumption about the university site lives in this
//! module, so a redesign of the site only requires changes here.
//!
//! | Page | Module | Region | Yields |
//! |------|--------|--------|--------|
//! | Department index | [`departments`] | `.description-text a[href]` | `Vec<Department>` |
//! | Professor roster | [`professors`] | `.picture-cards .item` | `Vec<ProfessorStub>` |
//! | Thesis tab | [`theses`] | `.inner-text`, `.report-list` | `[ThesisSectionGroup; 2]` |
//!
//! Each extractor is a pure function of a parsed [`scraper::Html`] document,
//! so it can be tested offline against fixture HTML. Fetching is done by
//! [`crate::aggregate`].

pub mod departments;
pub mod professors;
pub mod theses;

use crate::error::ExtractionError;
use scraper::{ElementRef, Selector};
use url::Url;

/// Parse a CSS selector, reporting failures as [`ExtractionError::Selector`].
pub(crate) fn selector(css: &'static str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        css,
        reason: e.to_string(),
    })
}

/// Resolve a possibly relative `href` against the page it was found on.
pub(crate) fn resolve(base: &Url, href: &str) -> String {
    base.join(href.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.trim().to_string())
}

/// Concatenated text content of an element, trimmed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
