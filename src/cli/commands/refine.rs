//! `docforge refine`

use anyhow::{Context, Result};
use std::path::Path;

use super::common::build_workflow;
use crate::Config;

/// Refine content given inline or read from `file`
pub async fn execute_refine_command(
    content: Option<&str>,
    file: Option<&Path>,
    instruction: &str,
    identity: &str,
    config: &Config,
) -> Result<()> {
    let current = match (content, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file: {}", path.display()))?,
        (None, None) => anyhow::bail!("either --content or --file is required"),
    };

    let workflow = build_workflow(config)?;
    let refined = workflow
        .refine_section(&current, instruction, identity)
        .await?;
    println!("{refined}");
    Ok(())
}
