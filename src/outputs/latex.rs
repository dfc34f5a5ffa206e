//! LaTeX document rendering.
//!
//! [`render`] walks a department's professor tree and emits a complete
//! `article` document:
//!
//! ```text
//! preamble, \title, \tableofcontents
//! \section{professor}            one per professor, roster order
//!   role | link
//!   \subsection{group label}     always two: proposed, assigned
//!     \subsubsection{title}      one per thesis section
//!       itemize                  one \item per sanitized entry
//! \end{document}
//! ```
//!
//! Thesis entries go through [`sanitize`] exactly once, here. Names, roles
//! and headings are escaped with [`escape_text`]. Whitespace runs are
//! collapsed once over the finished body.

use crate::error::RenderError;
use crate::models::{Department, Professor, ThesisSection, ThesisSectionGroup};
use crate::sanitize::{collapse_whitespace, escape_href, escape_text, sanitize};
use std::fmt::Write;

const PREAMBLE: &str = r"\documentclass[a4paper]{article}
\usepackage[utf8]{inputenc}
\usepackage[italian]{babel}
\usepackage[T1]{fontenc}
\usepackage{enumerate}
\usepackage{hyperref}
";

/// Label of the link to a professor's personal page.
const HOMEPAGE_LABEL: &str = "sito web";

/// Render the document for `department`. Pure and deterministic.
///
/// # Arguments
///
/// * `department` - Supplies the document title
/// * `professors` - Roster-ordered professors with their thesis groups
///
/// # Returns
///
/// A complete `article` ending in `\end{document}`. Every entry is passed
/// through [`sanitize`] once; the error only surfaces a formatter failure.
pub fn render(department: &Department, professors: &[Professor]) -> Result<String, RenderError> {
    let mut writer = LatexWriter::default();
    writer.preamble(department)?;
    for professor in professors {
        writer.professor(professor)?;
    }
    Ok(writer.finish())
}

#[derive(Debug, Default)]
struct LatexWriter {
    body: String,
}

impl LatexWriter {
    fn preamble(&mut self, department: &Department) -> Result<(), RenderError> {
        self.body.push_str(PREAMBLE);
        writeln!(self.body, r"\title{{Tesi {}}}", escape_text(&department.name))?;
        writeln!(self.body, r"\date{{\today}}")?;
        writeln!(self.body, r"\begin{{document}}")?;
        writeln!(self.body, r"\maketitle")?;
        writeln!(self.body, r"\tableofcontents")?;
        Ok(())
    }

    fn professor(&mut self, professor: &Professor) -> Result<(), RenderError> {
        writeln!(self.body, r"\section{{{}}}", escape_text(&professor.name))?;
        writeln!(
            self.body,
            r"{} | \underline{{\href{{{}}}{{{}}}}}",
            escape_text(&professor.role),
            escape_href(&professor.url),
            HOMEPAGE_LABEL
        )?;
        for group in &professor.thesis_sections {
            self.group(group)?;
        }
        Ok(())
    }

    fn group(&mut self, group: &ThesisSectionGroup) -> Result<(), RenderError> {
        writeln!(self.body, r"\subsection{{{}}}", escape_text(&group.label))?;
        for section in &group.sections {
            self.section(section)?;
        }
        Ok(())
    }

    fn section(&mut self, section: &ThesisSection) -> Result<(), RenderError> {
        writeln!(self.body, r"\subsubsection{{{}}}", escape_text(&section.title))?;
        // itemize with no \item does not compile
        if section.entries.is_empty() {
            return Ok(());
        }
        writeln!(self.body)?;
        writeln!(self.body, r"\begin{{itemize}}")?;
        for entry in &section.entries {
            writeln!(self.body, r"  \item {}", sanitize(entry))?;
        }
        writeln!(self.body, r"\end{{itemize}}")?;
        Ok(())
    }

    fn finish(self) -> String {
        let mut document = collapse_whitespace(&self.body);
        document.push_str("\\end{document}\n");
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::thesis_groups;

    fn department() -> Department {
        Department {
            name: "Chimica \"Giacomo Ciamician\" - CHIM".to_string(),
            code: "chimica".to_string(),
            url: "https://chimica.unibo.it/it".to_string(),
        }
    }

    fn professor(name: &str, proposed: Vec<ThesisSection>, assigned: Vec<ThesisSection>) -> Professor {
        Professor {
            name: name.to_string(),
            url: format!("https://www.unibo.it/sitoweb/{}", name.to_lowercase()),
            role: "Professore Ordinario".to_string(),
            thesis_sections: thesis_groups(proposed, assigned),
        }
    }

    fn section(title: &str, entries: &[&str]) -> ThesisSection {
        ThesisSection {
            title: title.to_string(),
            entries: entries.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_department_is_well_formed() {
        let doc = render(&department(), &[]).unwrap();
        assert!(doc.starts_with(r"\documentclass[a4paper]{article}"));
        assert!(doc.contains(r#"\title{Tesi Chimica "Giacomo Ciamician" - CHIM}"#));
        assert!(doc.contains(r"\maketitle"));
        assert!(doc.contains(r"\tableofcontents"));
        assert!(!doc.contains(r"\section{"));
        assert!(doc.ends_with("\\end{document}\n"));
        assert_eq!(doc.matches(r"\begin{document}").count(), 1);
    }

    #[test]
    fn test_professor_without_theses_has_two_bare_subsections() {
        let doc = render(&department(), &[professor("Verdi", vec![], vec![])]).unwrap();
        assert!(doc.contains(r"\subsection{Tesi proposte}"));
        assert!(doc.contains(r"\subsection{Tesi assegnate}"));
        assert!(!doc.contains(r"\subsubsection"));
        assert!(!doc.contains(r"\begin{itemize}"));
        let proposed = doc.find(r"\subsection{Tesi proposte}").unwrap();
        let assigned = doc.find(r"\subsection{Tesi assegnate}").unwrap();
        assert!(proposed < assigned);
    }

    #[test]
    fn test_role_and_homepage_line() {
        let doc = render(&department(), &[professor("Verdi", vec![], vec![])]).unwrap();
        assert!(doc.contains(
            r"Professore Ordinario | \underline{\href{https://www.unibo.it/sitoweb/verdi}{sito web}}"
        ));
    }

    #[test]
    fn test_entries_sanitized_exactly_once() {
        let prof = professor(
            "Bianchi",
            vec![section(
                "All",
                &[r#"<p>Vedi <a href="https://example.org/a">R&amp;D</a> #1</p>"#],
            )],
            vec![section("Tesi di laurea", &["Rust & C++ al 100%"])],
        );
        let doc = render(&department(), &[prof]).unwrap();
        assert!(doc.contains(r"\item Vedi \underline{\href{https://example.org/a}{R\&D}} \#1"));
        assert!(doc.contains(r"\item Rust \& C++ al 100\%"));
        assert!(!doc.contains(r"\\&"));
        assert!(!doc.contains("<p>"));
    }

    #[test]
    fn test_sections_and_items_keep_page_order() {
        let prof = professor(
            "Neri",
            vec![],
            vec![
                section("Tesi di laurea", &["alfa", "beta"]),
                section("Tesi di laurea magistrale", &["gamma"]),
            ],
        );
        let doc = render(&department(), &[prof]).unwrap();
        let positions: Vec<usize> = [
            r"\subsubsection{Tesi di laurea}",
            r"\item alfa",
            r"\item beta",
            r"\subsubsection{Tesi di laurea magistrale}",
            r"\item gamma",
        ]
        .iter()
        .map(|needle| doc.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_professor_order_is_input_order() {
        let profs = vec![
            professor("Zeta", vec![], vec![]),
            professor("Alfa", vec![], vec![]),
            professor("Mu", vec![], vec![]),
        ];
        let doc = render(&department(), &profs).unwrap();
        let z = doc.find(r"\section{Zeta}").unwrap();
        let a = doc.find(r"\section{Alfa}").unwrap();
        let m = doc.find(r"\section{Mu}").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn test_section_without_entries_has_no_itemize() {
        let prof = professor("Gialli", vec![], vec![section("Tesi di dottorato", &[])]);
        let doc = render(&department(), &[prof]).unwrap();
        assert!(doc.contains(r"\subsubsection{Tesi di dottorato}"));
        assert!(!doc.contains(r"\begin{itemize}"));
    }

    #[test]
    fn test_special_characters_in_leaves_are_escaped() {
        let mut prof = professor("D'Amico & Figli", vec![], vec![section("Tesi #2", &["x"])]);
        prof.url = "https://www.unibo.it/sitoweb/d.amico#tesi".to_string();
        let doc = render(&department(), &[prof]).unwrap();
        assert!(doc.contains(r"\section{D'Amico \& Figli}"));
        assert!(doc.contains(r"\subsubsection{Tesi \#2}"));
        assert!(doc.contains(r"\href{https://www.unibo.it/sitoweb/d.amico\#tesi}"));
    }

    #[test]
    fn test_whitespace_collapsed_once() {
        let prof = professor("Rosa", vec![], vec![section("T", &["uno    due", "tre\n\nquattro"])]);
        let doc = render(&department(), &[prof]).unwrap();
        assert!(!doc.contains("  "));
        assert!(doc.contains(r"\item uno due"));
        assert!(doc.contains(r"\item tre quattro"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let profs = vec![professor("Blu", vec![section("All", &["<b>x</b>"])], vec![])];
        assert_eq!(
            render(&department(), &profs).unwrap(),
            render(&department(), &profs).unwrap()
        );
    }
}
