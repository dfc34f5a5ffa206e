//! Helpers for the driver: department selection, listing and output checks.

use crate::models::Department;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Pick the departments to process.
///
/// With `all` every department is returned in index order. Otherwise each
/// requested code (case-insensitive) is looked up; unknown codes are returned
/// as the error so the caller can report them together.
pub fn select_departments(
    departments: &[Department],
    codes: &[String],
    all: bool,
) -> Result<Vec<Department>, Vec<String>> {
    if all {
        return Ok(departments.to_vec());
    }

    let mut selected = Vec::new();
    let mut unknown = Vec::new();
    for code in codes {
        let code = code.trim().to_lowercase();
        match departments.iter().find(|d| d.code == code) {
            Some(department) if !selected.contains(department) => selected.push(department.clone()),
            Some(_) => {}
            None => unknown.push(code),
        }
    }

    if unknown.is_empty() {
        Ok(selected)
    } else {
        Err(unknown)
    }
}

/// Human-readable listing of department codes and names.
pub fn format_department_list(departments: &[Department]) -> String {
    let width = departments.iter().map(|d| d.code.len()).max().unwrap_or(0);
    departments
        .iter()
        .map(|d| format!("{:<width$}  {}\n", d.code, d.name, width = width))
        .collect()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file so
/// permission problems surface before any page is fetched.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe = path.join("..__probe_write__");
    fs::write(&probe, b"").await?;
    if let Err(e) = fs::remove_file(&probe).await {
        warn!(probe = %probe.display(), error = %e, "Could not remove write probe");
    }
    info!("Output directory is writable");
    Ok(())
}
