//! # unibo_theses
//!
//! Collects the thesis listings published by University of Bologna
//! professors and typesets them, one LaTeX (or AsciiDoc) document per
//! department.
//!
//! ## Usage
//!
//! ```sh
//! unibo_theses -d disi -o ./site
//! unibo_theses --all --json
//! unibo_theses -d chimica --format adoc
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: read the department index and derive each department code
//! 2. **Roster**: fetch a department's professor cards
//! 3. **Theses**: fetch every professor's thesis tab (bounded concurrency)
//! 4. **Output**: render the tree and write `<code>.tex` or `<code>.adoc`
//!
//! Failures are scoped to one department: the others still produce output,
//! and the run ends with a summary of which departments failed.

use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod outputs;
mod sanitize;
mod scrapers;
mod utils;

use aggregate::{aggregate, discover_departments};
use cli::Cli;
use config::{Settings, load_settings};
use error::PipelineError;
use fetch::{HttpFetcher, PageFetcher};
use models::Department;
use outputs::{Format, json, write_document};
use utils::{ensure_writable_dir, format_department_list, select_departments};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init ---
    let default_level = if args.quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("unibo_theses starting up");
    debug!(?args, "Parsed CLI arguments");

    let settings = load_settings(args.config.as_deref())
        .await?
        .with_overrides(args.concurrency, args.department_concurrency);
    debug!(?settings, "Effective settings");

    let fetcher = HttpFetcher::new(&settings)?;

    // ---- Discover departments ----
    let departments = discover_departments(&fetcher, &settings).await?;

    if args.list {
        print!("{}", format_department_list(&departments));
        return Ok(());
    }

    let selected = match select_departments(&departments, &args.departments, args.all) {
        Ok(selected) => selected,
        Err(unknown) => {
            error!(codes = ?unknown, "Unknown department code; use the subdomain, e.g. DIFA -> fisica-astronomia");
            eprint!("{}", format_department_list(&departments));
            return Err(format!("unknown department code(s): {}", unknown.join(", ")).into());
        }
    };

    // Early check: fail before fetching anything if output cannot be written
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable"
        );
        return Err(e);
    }

    // ---- Harvest departments (isolated, concurrently) ----
    info!(
        departments = selected.len(),
        width = settings.department_concurrency,
        "Harvesting departments"
    );
    let outcomes: Vec<(Department, Result<PathBuf, PipelineError>)> = stream::iter(selected)
        .map(|department| {
            let fetcher = &fetcher;
            let settings = &settings;
            let output_dir = args.output_dir.as_path();
            let format = args.format;
            let write_json = args.json;
            async move {
                let result = harvest_department(
                    fetcher,
                    settings,
                    &department,
                    output_dir,
                    format,
                    write_json,
                )
                .await;
                (department, result)
            }
        })
        .buffer_unordered(settings.department_concurrency)
        .collect()
        .await;

    // ---- Report ----
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for (department, result) in outcomes {
        match result {
            Ok(path) => {
                info!(code = %department.code, path = %path.display(), "Department done");
                succeeded.push(department.code);
            }
            Err(e) => {
                error!(code = %department.code, name = %department.name, error = %e, "Department failed");
                failed.push(department.code);
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        succeeded = ?succeeded,
        failed = ?failed,
        "Execution complete"
    );

    if failed.is_empty() {
        Ok(())
    } else {
        warn!(count = failed.len(), "Some departments produced no document");
        Err(format!("{} department(s) failed: {}", failed.len(), failed.join(", ")).into())
    }
}

/// Run the whole pipeline for one department and write its document.
#[instrument(level = "info", skip_all, fields(code = %department.code))]
async fn harvest_department<F: PageFetcher>(
    fetcher: &F,
    settings: &Settings,
    department: &Department,
    output_dir: &Path,
    format: Format,
    write_json: bool,
) -> Result<PathBuf, PipelineError> {
    info!(name = %department.name, "Collecting professors and theses");
    let professors = aggregate(fetcher, settings, department).await?;

    let document = format.render(department, &professors)?;
    if write_json {
        json::write_tree(output_dir, department, &professors).await?;
    }
    write_document(output_dir, department, format, &document).await
}
