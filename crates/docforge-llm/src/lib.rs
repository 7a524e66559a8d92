//! Text generation for docforge
//!
//! Providers implement [`GenerationProvider`] and make exactly one attempt per
//! call. [`GenerationClient`] wraps a provider with per-identity rate limiting,
//! exponential backoff, fatal-error classification and caller cancellation.
//! The provider is picked once, at construction, from configuration.

mod client;
mod gemini_backend;
pub(crate) mod http_client;
mod mock_provider;
pub mod prompts;
mod rate_limiter;
mod types;

use std::sync::Arc;

use docforge_config::{Config, ProviderKind};
use tracing::{info, warn};

pub use client::{CallOptions, GenerationClient, RetryPolicy, is_fatal_message};
pub use docforge_utils::error::LlmError;
pub use gemini_backend::GeminiProvider;
pub use mock_provider::{MockProvider, MockScenario};
pub use rate_limiter::{
    Clock, REMAINING_HEADER, RESET_HEADER, RateLimitStatus, RateLimiter, SystemClock,
};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, GenerationProvider, GenerationRequest,
    GenerationResult,
};

/// Build the provider selected by `[llm] provider`.
///
/// `auto` picks Gemini when its API key variable holds a value and the mock
/// provider otherwise.
///
/// # Errors
///
/// Returns `LlmError::Misconfiguration` if `gemini` is selected explicitly and
/// its API key is missing, or the HTTP client cannot be built.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn GenerationProvider>, LlmError> {
    provider_from_config_with_env(config, |key| std::env::var(key).ok())
}

fn provider_from_config_with_env<F>(
    config: &Config,
    env: F,
) -> Result<Arc<dyn GenerationProvider>, LlmError>
where
    F: Fn(&str) -> Option<String>,
{
    match config.provider_kind() {
        ProviderKind::Mock => {
            info!("Using mock generation provider");
            Ok(Arc::new(MockProvider::new()))
        }
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new_from_config(config)?)),
        ProviderKind::Auto => {
            let key_env = config.gemini_api_key_env();
            if env(key_env).is_some_and(|k| !k.trim().is_empty()) {
                info!("Using Gemini generation provider");
                Ok(Arc::new(GeminiProvider::new_from_config(config)?))
            } else {
                warn!(
                    api_key_env = key_env,
                    "No API key found; falling back to mock generation provider"
                );
                Ok(Arc::new(MockProvider::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_mock_provider() {
        let config = Config::builder().provider("mock").build().unwrap();
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "mock");
        assert!(provider.is_mock());
    }

    #[test]
    fn test_auto_without_key_falls_back_to_mock() {
        let config = Config::builder()
            .gemini_api_key_env("DOCFORGE_TEST_UNSET_KEY_VAR")
            .build()
            .unwrap();
        let provider = provider_from_config_with_env(&config, |_| None).unwrap();
        assert!(provider.is_mock());
    }

    #[test]
    fn test_explicit_gemini_without_key_is_misconfiguration() {
        let config = Config::builder()
            .provider("gemini")
            .gemini_api_key_env("DOCFORGE_TEST_DEFINITELY_UNSET_KEY")
            .build()
            .unwrap();
        let err = provider_from_config(&config).err().unwrap();
        assert!(matches!(err, LlmError::Misconfiguration(ref m) if m.contains("API key")));
    }
}
