//! Department index extractor.
//!
//! The index page has a `.description-text` block with one link per
//! department. Each department lives on its own subdomain, e.g.
//! `https://chimica.unibo.it/it`, and that subdomain is the department code.
//!
//! A single malformed link is logged and skipped; only a missing
//! description block fails the whole extraction.

use super::{selector, text_of};
use crate::error::{ExtractionError, PageKind};
use crate::models::Department;
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

const REGION: &str = ".description-text";
const LINKS: &str = "a[href]";

/// Extract every department linked from the index page, in page order.
///
/// # Arguments
///
/// * `document` - Parsed department index page
/// * `domain` - Institutional domain; a link's host must be `<code>.<domain>`
///
/// # Returns
///
/// Departments deduplicated by code. Links whose host does not carry a
/// subdomain of `domain` are logged and skipped.
///
/// # Errors
///
/// `MissingRegion` when the page has no department list at all.
pub fn extract_departments(
    document: &Html,
    domain: &str,
) -> Result<Vec<Department>, ExtractionError> {
    let region_selector = selector(REGION)?;
    let link_selector = selector(LINKS)?;

    let region = document
        .select(&region_selector)
        .next()
        .ok_or(ExtractionError::MissingRegion {
            page: PageKind::DepartmentIndex,
            selector: REGION,
        })?;

    let mut departments = Vec::new();
    for link in region.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        match department_code(href, domain) {
            Ok(code) => departments.push(Department {
                name: text_of(link),
                code,
                url: href.trim().to_string(),
            }),
            Err(e) => warn!(error = %e, "Skipping department link"),
        }
    }

    let found = departments.len();
    let departments: Vec<Department> = departments
        .into_iter()
        .unique_by(|d| d.code.clone())
        .collect();
    if departments.len() < found {
        debug!(
            duplicates = found - departments.len(),
            "Dropped duplicate department links"
        );
    }

    info!(count = departments.len(), "Extracted departments");
    Ok(departments)
}

/// Derive the lower-cased department code from `https://<code>.<domain>/...`.
pub fn department_code(href: &str, domain: &str) -> Result<String, ExtractionError> {
    let malformed = |reason: String| ExtractionError::MalformedDepartmentLink {
        href: href.to_string(),
        domain: domain.to_string(),
        reason,
    };

    let url = Url::parse(href.trim()).map_err(|e| malformed(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(malformed(format!("unsupported scheme `{}`", url.scheme())));
    }
    let host = url
        .host_str()
        .ok_or_else(|| malformed("no host".to_string()))?
        .to_lowercase();
    let suffix = format!(".{}", domain.to_lowercase());

    match host.strip_suffix(&suffix) {
        Some(code) if !code.is_empty() => Ok(code.to_string()),
        _ => Err(malformed(format!("host `{host}` has no department subdomain"))),
    }
}
