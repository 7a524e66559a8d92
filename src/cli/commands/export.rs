//! `docforge export`

use anyhow::{Context, Result};
use std::path::Path;

use super::common::write_artifact;
use crate::{Config, ExportDispatcher, ExportJob};

/// Package the project file at `project` into the configured output directory.
///
/// Export never generates text, so no provider is built.
pub fn execute_export_command(project: &Path, config: &Config) -> Result<()> {
    let json = std::fs::read_to_string(project)
        .with_context(|| format!("Failed to read project file: {}", project.display()))?;
    let job = ExportJob::from_json(&json)?;

    let artifact = job.run(&ExportDispatcher::new())?;
    let path = write_artifact(&config.output_dir(), &artifact)?;

    println!(
        "✓ Exported {} section(s) to {} ({}, {} bytes)",
        job.sections.len(),
        path.display(),
        artifact.content_type,
        artifact.bytes.len()
    );
    Ok(())
}
