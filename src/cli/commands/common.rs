//! Helpers shared by the command handlers

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Config, ExportArtifact, Workflow};

/// Workflow wired from the effective configuration
pub fn build_workflow(config: &Config) -> Result<Workflow> {
    let workflow = Workflow::from_config(config)?;
    if workflow.client().is_mock() {
        tracing::debug!("Responses come from the offline mock provider");
    }
    Ok(workflow)
}

/// Write `artifact` into `dir` under its suggested filename.
///
/// The bytes go to a temporary file in the same directory first and are
/// renamed into place, so a reader never sees a partial package.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let target = dir.join(&artifact.filename);
    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in: {}", dir.display()))?;
    temp_file
        .write_all(&artifact.bytes)
        .context("Failed to write package to temporary file")?;
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync temporary file")?;
    temp_file
        .persist(&target)
        .with_context(|| format!("Failed to move package into place: {}", target.display()))?;

    tracing::info!(path = %target.display(), bytes = artifact.bytes.len(), "Wrote export");
    Ok(target)
}
