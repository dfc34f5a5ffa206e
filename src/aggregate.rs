//! Department traversal: index → roster → thesis pages.
//!
//! [`aggregate`] builds one department's professor tree. The roster is
//! fetched first; thesis pages are then fetched by a bounded pool whose width
//! is [`Settings::concurrency`]. Results land in one slot per roster position,
//! so the output keeps roster order no matter which fetch finishes first.
//!
//! The unit of failure is the department. The first professor that fails
//! ends the traversal, and dropping the pool cancels the fetches still in
//! flight.

use crate::config::{Endpoints, Settings};
use crate::error::{FetchError, PipelineError};
use crate::fetch::PageFetcher;
use crate::models::{Department, Professor, ProfessorStub};
use crate::scrapers::{departments, professors, theses};
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::time::Instant;
use tracing::{debug, info, instrument};
use url::Url;

/// Fetch the department index and extract every department on it.
#[instrument(level = "info", skip_all, fields(url = %settings.endpoints.departments_url))]
pub async fn discover_departments<F: PageFetcher>(
    fetcher: &F,
    settings: &Settings,
) -> Result<Vec<Department>, PipelineError> {
    let html = fetcher.fetch(&settings.endpoints.departments_url).await?;
    let document = Html::parse_document(&html);
    let found = departments::extract_departments(&document, &settings.endpoints.domain)?;
    Ok(found)
}

/// Build the full professor/thesis tree of `department`.
///
/// Fetches the roster, then every professor's thesis tab, at most
/// `settings.concurrency` at a time.
///
/// # Arguments
///
/// * `fetcher` - Page source, HTTP in production
/// * `settings` - Endpoints and pool width
/// * `department` - The department to collect
///
/// # Returns
///
/// Professors in roster order regardless of completion order. The first
/// failure drops the pool, cancelling the requests still in flight, and is
/// returned as the department's error.
#[instrument(level = "info", skip_all, fields(code = %department.code))]
pub async fn aggregate<F: PageFetcher>(
    fetcher: &F,
    settings: &Settings,
    department: &Department,
) -> Result<Vec<Professor>, PipelineError> {
    let t0 = Instant::now();
    let roster_url = settings.endpoints.roster_url(&department.code);
    let base = Url::parse(&roster_url).map_err(|source| FetchError::InvalidUrl {
        url: roster_url.clone(),
        source,
    })?;

    let html = fetcher.fetch(&roster_url).await?;
    let stubs = {
        let document = Html::parse_document(&html);
        professors::extract_professors(&document, &base)?
    };
    let total = stubs.len();
    info!(professors = total, width = settings.concurrency, "Fetching thesis pages");

    let endpoints = &settings.endpoints;
    let mut pending = stream::iter(stubs.into_iter().enumerate())
        .map(|(index, stub)| async move {
            (index, professor_with_theses(fetcher, endpoints, stub).await)
        })
        .buffer_unordered(settings.concurrency);

    let mut slots: Vec<Option<Professor>> = (0..total).map(|_| None).collect();
    while let Some((index, result)) = pending.next().await {
        slots[index] = Some(result?);
    }

    let professors: Vec<Professor> = slots.into_iter().flatten().collect();
    info!(
        professors = professors.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Aggregated department"
    );
    Ok(professors)
}

/// Fetch one professor's thesis tab and attach it to the stub.
async fn professor_with_theses<F: PageFetcher>(
    fetcher: &F,
    endpoints: &Endpoints,
    stub: ProfessorStub,
) -> Result<Professor, PipelineError> {
    let url = endpoints.thesis_url(&stub.url);
    debug!(professor = %stub.name, %url, "Visiting thesis page");
    let html = fetcher.fetch(&url).await?;
    let groups = {
        let document = Html::parse_document(&html);
        theses::extract_theses(&document)?
    };
    Ok(Professor::from_stub(stub, groups))
}
