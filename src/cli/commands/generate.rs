//! `docforge generate`

use anyhow::Result;

use super::common::build_workflow;
use crate::Config;

/// Send a free-form prompt and print the response
pub async fn execute_generate_command(prompt: &str, identity: &str, config: &Config) -> Result<()> {
    let workflow = build_workflow(config)?;
    let result = workflow.generate_text(prompt, identity).await?;

    println!("{}", result.text);
    if result.sourced_from_mock {
        eprintln!("(response from the offline mock provider)");
    }
    Ok(())
}
