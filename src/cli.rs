//! Command-line interface definitions.
//!
//! Exactly one of `--department`, `--all` or `--list` selects what to do.
//! Paths and the settings file can also come from environment variables.

use crate::outputs::Format;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Collect thesis listings from University of Bologna departments and
/// typeset them as LaTeX (or AsciiDoc) documents.
///
/// # Examples
///
/// ```sh
/// # One department, written to ./site/disi.tex
/// unibo_theses -d disi
///
/// # Several departments plus the raw JSON tree
/// unibo_theses -d chimica -d fisica-astronomia --json -o ./out
///
/// # Every department on the index page, 16 thesis pages at a time
/// unibo_theses --all --concurrency 16
///
/// # AsciiDoc instead of LaTeX: ./site/disi.adoc
/// unibo_theses -d disi --format adoc
///
/// # Show valid department codes
/// unibo_theses --list
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["departments", "all", "list"])
))]
pub struct Cli {
    /// Department code, i.e. its subdomain (disi, chimica, fisica-astronomia, ...). Repeatable.
    #[arg(short = 'd', long = "department", value_name = "CODE")]
    pub departments: Vec<String>,

    /// Process every department listed on the index page
    #[arg(long)]
    pub all: bool,

    /// Print the available department codes and exit
    #[arg(long)]
    pub list: bool,

    /// Output directory for the generated files
    #[arg(short, long, env = "UNIBO_THESES_OUTPUT_DIR", default_value = "site")]
    pub output_dir: PathBuf,

    /// Document format: `tex` writes `<code>.tex`, `adoc` writes `<code>.adoc`
    #[arg(short, long, value_enum, default_value_t = Format::Tex)]
    pub format: Format,

    /// Also write the extracted tree as `<code>.json`
    #[arg(long)]
    pub json: bool,

    /// Optional path to a YAML settings file
    #[arg(short, long, env = "UNIBO_THESES_CONFIG")]
    pub config: Option<String>,

    /// Thesis pages fetched concurrently per department
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Departments processed concurrently
    #[arg(long)]
    pub department_concurrency: Option<usize>,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
