//! Data models for the department → professor → thesis tree.
//!
//! - [`Department`]: one entry of the university's department index
//! - [`ProfessorStub`]: a roster card before its thesis page is fetched
//! - [`Professor`]: a roster card with both thesis groups attached
//! - [`ThesisSectionGroup`] / [`ThesisSection`]: the thesis listing itself
//!
//! Entry strings are stored raw, exactly as extracted. Escaping happens once,
//! at render time.

use serde::{Deserialize, Serialize};

/// Label of the free-text "proposed theses" group.
pub const PROPOSED_LABEL: &str = "Tesi proposte";
/// Label of the heading-per-block "assigned theses" group.
pub const ASSIGNED_LABEL: &str = "Tesi assegnate";
/// Title of the single synthetic section holding the proposed-theses block.
pub const PROPOSED_SECTION_TITLE: &str = "All";

/// A university department as listed on the department index page.
///
/// `code` is the lower-cased subdomain of `url` and identifies the department.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Department {
    pub name: String,
    pub code: String,
    pub url: String,
}

/// A professor as read from a roster picture-card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfessorStub {
    pub name: String,
    pub url: String,
    pub role: String,
}

/// A professor together with their thesis listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Professor {
    pub name: String,
    pub url: String,
    pub role: String,
    /// Always `[proposed, assigned]`, in that order.
    pub thesis_sections: [ThesisSectionGroup; 2],
}

impl Professor {
    pub fn from_stub(stub: ProfessorStub, thesis_sections: [ThesisSectionGroup; 2]) -> Self {
        Self {
            name: stub.name,
            url: stub.url,
            role: stub.role,
            thesis_sections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThesisSectionGroup {
    pub label: String,
    pub sections: Vec<ThesisSection>,
}

impl ThesisSectionGroup {
    /// Group `sections` under `label`.
    pub fn new(label: &str, sections: Vec<ThesisSection>) -> Self {
        Self {
            label: label.to_string(),
            sections,
        }
    }
}

/// A titled list of raw thesis entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThesisSection {
    pub title: String,
    pub entries: Vec<String>,
}

/// Build the canonical pair of groups, proposed first.
pub fn thesis_groups(
    proposed: Vec<ThesisSection>,
    assigned: Vec<ThesisSection>,
) -> [ThesisSectionGroup; 2] {
    [
        ThesisSectionGroup::new(PROPOSED_LABEL, proposed),
        ThesisSectionGroup::new(ASSIGNED_LABEL, assigned),
    ]
}
