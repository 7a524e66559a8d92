//! `docforge outline`

use anyhow::{Context, Result};

use super::common::build_workflow;
use crate::{Config, DocumentType};

/// Suggest titles for `topic` and print them numbered, or as a JSON array
pub async fn execute_outline_command(
    topic: &str,
    document_type: DocumentType,
    json: bool,
    identity: &str,
    config: &Config,
) -> Result<()> {
    let workflow = build_workflow(config)?;
    let titles = workflow
        .suggest_outline(topic, document_type, identity)
        .await?;

    if json {
        let out = serde_json::to_string_pretty(&titles).context("Failed to emit outline JSON")?;
        println!("{out}");
    } else {
        for (i, title) in titles.iter().enumerate() {
            println!("{}. {title}", i + 1);
        }
    }
    Ok(())
}
