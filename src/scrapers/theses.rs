//! Thesis tab extractor.
//!
//! A professor's thesis tab has two parts:
//!
//! - an optional free-text `.inner-text` block describing proposed theses,
//!   kept as raw inner HTML so links inside it survive until rendering;
//! - zero or more `.report-list` blocks, each an `h4` heading followed by a
//!   list of assigned theses.

use super::{selector, text_of};
use crate::error::{ExtractionError, PageKind};
use crate::models::{PROPOSED_SECTION_TITLE, ThesisSection, ThesisSectionGroup, thesis_groups};
use scraper::Html;
use tracing::debug;

const PROPOSED: &str = ".inner-text";
const REPORT_LIST: &str = ".report-list";
const HEADING: &str = "h4";
const ITEM: &str = "li";

/// Extract the `[proposed, assigned]` thesis groups from a thesis tab.
///
/// # Arguments
///
/// * `document` - Parsed thesis tab of one professor
///
/// # Returns
///
/// Both groups, always in that order. The proposed group holds at most one
/// section titled `"All"` whose entry is the block's inner HTML as scraper
/// re-serializes it: attributes sorted by name, and text `<`, `>` and `&` as
/// entities. Assigned entries are element text.
///
/// # Errors
///
/// `MissingField` when a `.report-list` block has no `h4` heading.
pub fn extract_theses(document: &Html) -> Result<[ThesisSectionGroup; 2], ExtractionError> {
    let proposed_selector = selector(PROPOSED)?;
    let list_selector = selector(REPORT_LIST)?;
    let heading_selector = selector(HEADING)?;
    let item_selector = selector(ITEM)?;

    let proposed: Vec<ThesisSection> = document
        .select(&proposed_selector)
        .next()
        .map(|block| block.inner_html().trim().to_string())
        .filter(|html| !html.is_empty())
        .map(|html| ThesisSection {
            title: PROPOSED_SECTION_TITLE.to_string(),
            entries: vec![html],
        })
        .into_iter()
        .collect();

    let mut assigned = Vec::new();
    for (index, list) in document.select(&list_selector).enumerate() {
        let heading = list
            .select(&heading_selector)
            .next()
            .ok_or(ExtractionError::MissingField {
                page: PageKind::Thesis,
                index,
                field: "h4 heading",
            })?;
        let entries = list.select(&item_selector).map(text_of).collect();
        assigned.push(ThesisSection {
            title: text_of(heading),
            entries,
        });
    }

    debug!(
        proposed = proposed.len(),
        assigned = assigned.len(),
        "Extracted thesis sections"
    );
    Ok(thesis_groups(proposed, assigned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::sanitize;

    #[test]
    fn test_full_thesis_page() {
        let html = r#"
            <div class="inner-text">
              <p>Tesi su <a href="https://example.org/ml">machine learning</a> &amp; dintorni.</p>
            </div>
            <div class="report-list">
              <h4>Tesi di laurea</h4>
              <ul>
                <li> Sistemi distribuiti — relatore: M. Rossi </li>
                <li>Blockchain e consenso</li>
              </ul>
            </div>
            <div class="report-list">
              <h4>Tesi di laurea magistrale</h4>
              <ul><li>Verifica formale</li></ul>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let [proposed, assigned] = extract_theses(&doc).unwrap();

        assert_eq!(proposed.label, "Tesi proposte");
        assert_eq!(proposed.sections.len(), 1);
        assert_eq!(proposed.sections[0].title, "All");
        let raw = &proposed.sections[0].entries[0];
        assert!(raw.starts_with("<p>Tesi su <a href=\"https://example.org/ml\">"));
        assert!(raw.contains("&amp;"));

        assert_eq!(assigned.label, "Tesi assegnate");
        let titles: Vec<&str> = assigned.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Tesi di laurea", "Tesi di laurea magistrale"]);
        assert_eq!(
            assigned.sections[0].entries,
            vec![
                "Sistemi distribuiti — relatore: M. Rossi".to_string(),
                "Blockchain e consenso".to_string()
            ]
        );
    }

    #[test]
    fn test_reordered_link_attributes_still_become_a_link() {
        let html = r#"<div class="inner-text"><p>Vedi <a href="https://example.org/bando" class="ext">il bando</a></p></div>"#;
        let doc = Html::parse_document(html);
        let [proposed, _] = extract_theses(&doc).unwrap();
        let raw = &proposed.sections[0].entries[0];
        assert!(raw.contains(r#"<a class="ext" href="https://example.org/bando">"#));

        let out = sanitize(raw);
        assert!(out.contains(r"\underline{\href{https://example.org/bando}{il bando}}"));
    }

    #[test]
    fn test_serialized_angle_brackets_are_typeset_as_text() {
        let html = r#"
            <div class="inner-text"><p>Tesi su a &lt; b e C&amp;C</p></div>
            <div class="report-list"><h4>Tesi</h4><ul><li>Caso a &lt; b</li></ul></div>
        "#;
        let doc = Html::parse_document(html);
        let [proposed, assigned] = extract_theses(&doc).unwrap();

        let raw = &proposed.sections[0].entries[0];
        assert!(raw.contains("a &lt; b"));
        assert_eq!(sanitize(raw), r" Tesi su a \textless{} b e C\&C ");

        assert_eq!(assigned.sections[0].entries[0], "Caso a < b");
        assert_eq!(
            sanitize(&assigned.sections[0].entries[0]),
            r"Caso a \textless{} b"
        );
    }

    #[test]
    fn test_blank_proposed_block_yields_no_section() {
        let html = "<div class=\"inner-text\">  \n  </div>";
        let doc = Html::parse_document(html);
        let [proposed, assigned] = extract_theses(&doc).unwrap();
        assert!(proposed.sections.is_empty());
        assert!(assigned.sections.is_empty());
    }

    #[test]
    fn test_empty_page_keeps_both_groups() {
        let doc = Html::parse_document("<html><body></body></html>");
        let groups = extract_theses(&doc).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Tesi proposte");
        assert_eq!(groups[1].label, "Tesi assegnate");
        assert!(groups.iter().all(|g| g.sections.is_empty()));
    }

    #[test]
    fn test_report_list_without_heading_fails() {
        let html = r#"<div class="report-list"><ul><li>Orfana</li></ul></div>"#;
        let doc = Html::parse_document(html);
        let err = extract_theses(&doc).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::MissingField {
                page: PageKind::Thesis,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_report_list_without_items() {
        let html = r#"<div class="report-list"><h4>Tesi di dottorato</h4></div>"#;
        let doc = Html::parse_document(html);
        let [_, assigned] = extract_theses(&doc).unwrap();
        assert_eq!(assigned.sections.len(), 1);
        assert!(assigned.sections[0].entries.is_empty());
    }
}
