//! JSON dump of a department's aggregated tree.
//!
//! Written next to the `.tex` file when `--json` is passed, so the raw,
//! unsanitized extraction result can be inspected or consumed by other tools:
//!
//! ```text
//! output_dir/
//! ├── disi.tex
//! └── disi.json
//! ```

use crate::error::PipelineError;
use crate::models::{Department, Professor};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct DepartmentTree<'a> {
    pub department: &'a Department,
    pub professors: &'a [Professor],
}

/// Serialize the tree to `{output_dir}/{code}.json` and return the path.
#[instrument(level = "info", skip_all, fields(code = %department.code))]
pub async fn write_tree(
    output_dir: &Path,
    department: &Department,
    professors: &[Professor],
) -> Result<PathBuf, PipelineError> {
    let tree = DepartmentTree {
        department,
        professors,
    };
    let json = serde_json::to_string_pretty(&tree)?;

    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(format!("{}.json", department.code));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON tree");
    Ok(path)
}
