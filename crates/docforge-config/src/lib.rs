//! Configuration for docforge
//!
//! Values resolve with precedence CLI > environment > config file > defaults,
//! and every resolved value remembers where it came from.

pub mod config;

pub use config::{
    CliArgs, Config, ConfigBuilder, ExportConfig, GeminiConfig, LlmConfig, ProviderKind,
    RateLimitConfig,
};
pub use config::{CONFIG_DIR, HOME_ENV_VAR, MAX_RETRIES_ENV_VAR, PROVIDER_ENV_VAR};
pub use docforge_utils::types::ConfigSource;
