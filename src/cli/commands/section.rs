//! `docforge section`

use anyhow::Result;

use super::common::build_workflow;
use crate::Config;

pub async fn execute_section_command(
    topic: &str,
    title: &str,
    identity: &str,
    config: &Config,
) -> Result<()> {
    let workflow = build_workflow(config)?;
    let content = workflow.generate_section(topic, title, identity).await?;
    println!("{content}");
    Ok(())
}
