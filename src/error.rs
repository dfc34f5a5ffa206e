//! Error taxonomy for the harvesting pipeline.
//!
//! Every failure is scoped to a single department: the driver catches a
//! [`PipelineError`] per department, reports it and moves on to the next one.
//!
//! | Error | Raised by | Recovered? |
//! |-------|-----------|------------|
//! | [`FetchError`] | [`crate::fetch`] | No, fails the department |
//! | [`ExtractionError`] | [`crate::scrapers`] | Only for malformed department links |
//! | [`RenderError`] | [`crate::outputs`] renderers | No, fails the department |

use std::fmt;
use thiserror::Error;

/// The kind of page an extraction was running against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    DepartmentIndex,
    Roster,
    Thesis,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageKind::DepartmentIndex => "department index",
            PageKind::Roster => "professor roster",
            PageKind::Thesis => "thesis page",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("`{url}` is not a valid URL: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{page}: structural region `{selector}` not found")]
    MissingRegion {
        page: PageKind,
        selector: &'static str,
    },
    #[error("{page}: item #{index} has no {field}")]
    MissingField {
        page: PageKind,
        index: usize,
        field: &'static str,
    },
    #[error("department link `{href}` does not match https://<code>.{domain}: {reason}")]
    MalformedDepartmentLink {
        href: String,
        domain: String,
        reason: String,
    },
    #[error("invalid selector `{css}`: {reason}")]
    Selector { css: &'static str, reason: String },
}

/// Writing into the in-memory document buffer failed.
#[derive(Debug, Error)]
#[error("failed to assemble document: {0}")]
pub struct RenderError(#[from] fmt::Error);

/// Anything that can fail a single department's run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize tree: {0}")]
    Json(#[from] serde_json::Error),
}
