//! `docforge config`

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use crate::Config;

/// Print every effective setting with its source
pub fn execute_config_command(json: bool, config: &Config) -> Result<()> {
    let effective = config.effective_config();

    if json {
        let map: BTreeMap<&str, serde_json::Value> = effective
            .iter()
            .map(|(key, (value, source))| {
                (
                    key.as_str(),
                    serde_json::json!({ "value": value, "source": source }),
                )
            })
            .collect();
        let out = serde_json::to_string_pretty(&map).context("Failed to emit config JSON")?;
        println!("{out}");
    } else {
        println!("Effective configuration:");
        for (key, (value, source)) in effective {
            println!("  {key} = {value} (from {source})");
        }
    }
    Ok(())
}
