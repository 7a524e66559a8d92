use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use docforge_utils::types::ConfigSource;

/// Default number of attempts per generation call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Backoff base; attempt `n` sleeps `base * 2^n`
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Per-attempt HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Rate-limit window length
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Requests allowed per identity per window
pub const DEFAULT_MAX_REQUESTS: u32 = 10;

/// Environment variable holding the Gemini API key
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini `generateContent` endpoint
pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-001:generateContent";

/// Which generation provider to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    /// Gemini when its API key variable is set, otherwise the offline mock
    #[default]
    Auto,
    /// Deterministic canned responses, no network
    Mock,
    /// Gemini `generateContent` over HTTPS
    Gemini,
}

/// Configuration for docforge operations.
///
/// # Configuration File Format
///
/// ```toml
/// [llm]
/// provider = "auto"
/// max_retries = 3
/// retry_base_delay_ms = 1000
/// request_timeout_secs = 60
///
/// [llm.gemini]
/// api_key_env = "GEMINI_API_KEY"
///
/// [rate_limit]
/// window_ms = 60000
/// max_requests = 10
///
/// [export]
/// output_dir = "exports"
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider selection and retry policy.
    pub llm: LlmConfig,
    /// Per-identity request window.
    pub rate_limit: RateLimitConfig,
    /// Where exported files are written by the CLI.
    pub export: ExportConfig,
    /// Source attribution for each setting (for `docforge config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[llm]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub provider: Option<String>,
    pub max_retries: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub gemini: Option<GeminiConfig>,
}

/// `[llm.gemini]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// Name of the environment variable that holds the key; the key itself never lives in config
    pub api_key_env: Option<String>,
    pub endpoint: Option<String>,
}

/// `[rate_limit]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub window_ms: Option<u64>,
    pub max_requests: Option<u32>,
}

/// `[export]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Some(ProviderKind::Auto.to_string()),
            max_retries: Some(DEFAULT_MAX_RETRIES),
            retry_base_delay_ms: Some(DEFAULT_RETRY_BASE_DELAY_MS),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            gemini: None,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: Some(DEFAULT_WINDOW_MS),
            max_requests: Some(DEFAULT_MAX_REQUESTS),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: Some(PathBuf::from(".")),
        }
    }
}

impl Config {
    /// Provider kind; unknown strings were rejected by validation, so this falls back to `Auto`
    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        self.llm
            .provider
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.llm.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    #[must_use]
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(
            self.llm
                .retry_base_delay_ms
                .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
        )
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.llm
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn gemini_api_key_env(&self) -> &str {
        self.llm
            .gemini
            .as_ref()
            .and_then(|g| g.api_key_env.as_deref())
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }

    #[must_use]
    pub fn gemini_endpoint(&self) -> &str {
        self.llm
            .gemini
            .as_ref()
            .and_then(|g| g.endpoint.as_deref())
            .unwrap_or(DEFAULT_GEMINI_ENDPOINT)
    }

    #[must_use]
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit.window_ms.unwrap_or(DEFAULT_WINDOW_MS))
    }

    #[must_use]
    pub fn rate_limit_max_requests(&self) -> u32 {
        self.rate_limit.max_requests.unwrap_or(DEFAULT_MAX_REQUESTS)
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Defaults only, no discovery. Used by tests and embedders that want a blank slate.
    #[must_use]
    pub fn defaults() -> Self {
        let mut source_attribution = HashMap::new();
        for key in super::ATTRIBUTED_KEYS {
            source_attribution.insert((*key).to_string(), ConfigSource::Defaults);
        }
        Self {
            llm: LlmConfig::default(),
            rate_limit: RateLimitConfig::default(),
            export: ExportConfig::default(),
            source_attribution,
        }
    }
}
