//! AsciiDoc document rendering.
//!
//! Same tree as [`super::latex`], laid out for asciidoctor:
//!
//! ```text
//! = Tesi <department>
//! :toc:
//! == professor                   one per professor, roster order
//! role | url[sito web]
//! === group label                always two: proposed, assigned
//! ==== title                     one per thesis section
//! * pass:[entry]                 one per entry
//! ```
//!
//! Entries are emitted through an inline passthrough so the raw HTML of the
//! proposed block reaches the HTML backend unchanged. Line structure is
//! significant in AsciiDoc, so whitespace is normalized per leaf instead of
//! over the whole document.

use crate::error::RenderError;
use crate::models::{Department, Professor, ThesisSection, ThesisSectionGroup};
use std::fmt::Write;

/// Label of the link to a professor's personal page.
const HOMEPAGE_LABEL: &str = "sito web";

/// Render the AsciiDoc document for `department`.
///
/// # Arguments
///
/// * `department` - Supplies the document title
/// * `professors` - Roster-ordered professors with their thesis groups
///
/// # Returns
///
/// The complete document. Pure and deterministic, like the LaTeX renderer.
pub fn render(department: &Department, professors: &[Professor]) -> Result<String, RenderError> {
    let mut writer = AsciidocWriter::default();
    writer.header(department)?;
    for professor in professors {
        writer.professor(professor)?;
    }
    Ok(writer.body)
}

#[derive(Debug, Default)]
struct AsciidocWriter {
    body: String,
}

impl AsciidocWriter {
    fn header(&mut self, department: &Department) -> Result<(), RenderError> {
        writeln!(self.body, "= Tesi {}", one_line(&department.name))?;
        writeln!(self.body, ":toc:")?;
        Ok(())
    }

    fn professor(&mut self, professor: &Professor) -> Result<(), RenderError> {
        writeln!(self.body)?;
        writeln!(self.body, "== {}", one_line(&professor.name))?;
        writeln!(
            self.body,
            "{} | {}[{}]",
            one_line(&professor.role),
            professor.url.trim(),
            HOMEPAGE_LABEL
        )?;
        for group in &professor.thesis_sections {
            self.group(group)?;
        }
        Ok(())
    }

    fn group(&mut self, group: &ThesisSectionGroup) -> Result<(), RenderError> {
        writeln!(self.body)?;
        writeln!(self.body, "=== {}", one_line(&group.label))?;
        for section in &group.sections {
            self.section(section)?;
        }
        Ok(())
    }

    fn section(&mut self, section: &ThesisSection) -> Result<(), RenderError> {
        writeln!(self.body)?;
        writeln!(self.body, "==== {}", one_line(&section.title))?;
        for entry in &section.entries {
            writeln!(self.body, "* pass:[{}]", passthrough(entry))?;
        }
        Ok(())
    }
}

/// Join every whitespace run, newlines included, into one space.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Content for `pass:[...]`: one line, with `]` escaped so it cannot close
/// the macro early.
fn passthrough(entry: &str) -> String {
    one_line(entry).replace(']', r"\]")
}
