//! `docforge draft`

use anyhow::Result;

use super::common::{build_workflow, write_artifact};
use crate::{Config, DocumentType};

/// Outline, draft and export in one run
pub async fn execute_draft_command(
    topic: &str,
    document_type: DocumentType,
    identity: &str,
    config: &Config,
) -> Result<()> {
    let workflow = build_workflow(config)?;
    let draft = workflow.draft(topic, document_type, identity).await?;
    let path = write_artifact(&config.output_dir(), &draft.artifact)?;

    println!("Drafted {} section(s):", draft.sections.len());
    for (i, section) in draft.sections.iter().enumerate() {
        println!("  {}. {}", i + 1, section.title);
    }
    println!("\n✓ Wrote {}", path.display());
    Ok(())
}
