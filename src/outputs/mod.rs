//! Output generation: the rendered document and the optional JSON tree.
//!
//! # Submodules
//!
//! - [`latex`]: renders a department's tree into a LaTeX document
//! - [`asciidoc`]: renders the same tree as AsciiDoc
//! - [`json`]: dumps the raw tree to JSON
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── chimica.tex
//! ├── disi.tex    # or disi.adoc with --format adoc
//! └── disi.json   # only with --json
//! ```

pub mod asciidoc;
pub mod json;
pub mod latex;

use crate::error::{PipelineError, RenderError};
use crate::models::{Department, Professor};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Document format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// LaTeX `article`, compile with pdflatex
    #[default]
    Tex,
    /// AsciiDoc, for asciidoctor
    Adoc,
}

impl Format {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Tex => "tex",
            Format::Adoc => "adoc",
        }
    }

    /// Render a department's tree in this format.
    pub fn render(
        self,
        department: &Department,
        professors: &[Professor],
    ) -> Result<String, RenderError> {
        match self {
            Format::Tex => latex::render(department, professors),
            Format::Adoc => asciidoc::render(department, professors),
        }
    }
}

/// Write a rendered document next to the other outputs.
///
/// # Arguments
///
/// * `output_dir` - Created if missing
/// * `department` - Its code names the file
/// * `format` - Picks the extension
/// * `document` - Rendered text
///
/// # Returns
///
/// The path written, `{output_dir}/{code}.{tex|adoc}`.
#[instrument(level = "info", skip_all, fields(code = %department.code, ?format))]
pub async fn write_document(
    output_dir: &Path,
    department: &Department,
    format: Format,
    document: &str,
) -> Result<PathBuf, PipelineError> {
    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(format!("{}.{}", department.code, format.extension()));
    fs::write(&path, document).await?;
    info!(path = %path.display(), bytes = document.len(), "Wrote document");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department() -> Department {
        Department {
            name: "DISI".to_string(),
            code: "disi".to_string(),
            url: "https://disi.unibo.it/it".to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_document_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site");
        let path = write_document(&nested, &department(), Format::Tex, "\\end{document}\n")
            .await
            .unwrap();
        assert_eq!(path, nested.join("disi.tex"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "\\end{document}\n");
    }

    #[tokio::test]
    async fn test_adoc_format_writes_adoc_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Format::Adoc.render(&department(), &[]).unwrap();
        let path = write_document(dir.path(), &department(), Format::Adoc, &doc)
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("disi.adoc"));
        assert!(std::fs::read_to_string(path).unwrap().starts_with("= Tesi DISI\n:toc:\n"));
        assert!(!dir.path().join("disi.tex").exists());
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(Format::default(), Format::Tex);
        let tex = Format::Tex.render(&department(), &[]).unwrap();
        assert!(tex.starts_with(r"\documentclass"));
        let adoc = Format::Adoc.render(&department(), &[]).unwrap();
        assert!(adoc.starts_with("= Tesi DISI"));
    }
}
