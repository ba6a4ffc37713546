use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Job;

pub const EXPORT_FILE: &str = "jobs_filtered.md";

pub fn render_export<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> String {
    jobs.into_iter()
        .map(|job| format!("{}\n\n---\n\n", job.content))
        .collect()
}

/// Writes `contents` in one call, replacing any previous export.
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote export");
    Ok(())
}
