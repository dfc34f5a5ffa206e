//! Professor roster extractor.
//!
//! The roster is a `.picture-cards` container with one `.item` card per
//! professor. A card's first link carries the name and personal page URL;
//! its first paragraph carries the academic role.
//!
//! A card missing any of those fields fails the whole roster, and with it the
//! department. Skipping incomplete cards would silently drop professors from
//! the generated document.

use super::{resolve, selector, text_of};
use crate::error::{ExtractionError, PageKind};
use crate::models::ProfessorStub;
use scraper::Html;
use tracing::info;
use url::Url;

const CONTAINER: &str = ".picture-cards";
const CARD: &str = ".item";
const LINK: &str = "a";
const ROLE: &str = "p";

/// Extract professor stubs in roster order.
///
/// # Arguments
///
/// * `document` - Parsed roster page
/// * `base` - Roster URL, for resolving relative profile links
///
/// # Returns
///
/// One stub per card. A missing container is an error; an empty one is not.
/// Any card without a link, an `href` or a role fails the whole roster.
pub fn extract_professors(
    document: &Html,
    base: &Url,
) -> Result<Vec<ProfessorStub>, ExtractionError> {
    let container_selector = selector(CONTAINER)?;
    let card_selector = selector(CARD)?;
    let link_selector = selector(LINK)?;
    let role_selector = selector(ROLE)?;

    let container = document
        .select(&container_selector)
        .next()
        .ok_or(ExtractionError::MissingRegion {
            page: PageKind::Roster,
            selector: CONTAINER,
        })?;

    let missing = |index: usize, field: &'static str| ExtractionError::MissingField {
        page: PageKind::Roster,
        index,
        field,
    };

    let mut stubs = Vec::new();
    for (index, card) in container.select(&card_selector).enumerate() {
        let link = card
            .select(&link_selector)
            .next()
            .ok_or_else(|| missing(index, "link"))?;
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| missing(index, "href"))?;
        let role = card
            .select(&role_selector)
            .next()
            .ok_or_else(|| missing(index, "role paragraph"))?;

        stubs.push(ProfessorStub {
            name: text_of(link),
            url: resolve(base, href),
            role: text_of(role),
        });
    }

    info!(count = stubs.len(), "Extracted professors");
    Ok(stubs)
}
