//! `docforge limits`

use anyhow::{Context, Result};

use crate::{Config, RateLimiter};

/// Print the rate-limit quota left for `identity`.
///
/// Windows live in process memory only, so a fresh CLI process always starts
/// with the full quota and a zero reset time.
pub fn execute_limits_command(json: bool, identity: &str, config: &Config) -> Result<()> {
    let limiter = RateLimiter::from_config(config);
    let status = limiter.status(identity);

    if json {
        let value = serde_json::json!({
            "identity": identity,
            "remaining": status.remaining,
            "reset_in_ms": status.reset_in_ms,
            "max_requests": limiter.max_requests(),
            "window_ms": u64::try_from(limiter.window().as_millis()).unwrap_or(u64::MAX),
        });
        let out = serde_json::to_string_pretty(&value).context("Failed to emit limits JSON")?;
        println!("{out}");
    } else {
        println!("Rate limit for '{identity}':");
        println!(
            "  {} of {} request(s) remaining per {}s window",
            status.remaining,
            limiter.max_requests(),
            limiter.window().as_secs()
        );
        for (header, value) in status.headers() {
            println!("  {header}: {value}");
        }
    }
    Ok(())
}
