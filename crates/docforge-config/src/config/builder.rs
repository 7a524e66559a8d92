use std::path::PathBuf;
use std::time::Duration;

use docforge_utils::error::DocforgeError;

use super::{Config, ConfigSource, GeminiConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding docforge without touching environment variables
    /// or config files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docforge_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .provider("mock")
    ///     .max_retries(2)
    ///     .retry_base_delay(Duration::from_millis(10))
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.max_retries(), 2);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Fluent builder for [`Config`].
///
/// Every value set here is attributed to `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    provider: Option<String>,
    max_retries: Option<u32>,
    retry_base_delay: Option<Duration>,
    request_timeout: Option<Duration>,
    gemini_api_key_env: Option<String>,
    gemini_endpoint: Option<String>,
    rate_limit_window: Option<Duration>,
    rate_limit_max_requests: Option<u32>,
    output_dir: Option<PathBuf>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    #[must_use]
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn gemini_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.gemini_api_key_env = Some(var.into());
        self
    }

    #[must_use]
    pub fn gemini_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.gemini_endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn rate_limit_window(mut self, window: Duration) -> Self {
        self.rate_limit_window = Some(window);
        self
    }

    #[must_use]
    pub fn rate_limit_max_requests(mut self, max: u32) -> Self {
        self.rate_limit_max_requests = Some(max);
        self
    }

    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DocforgeError::Config` when a value is out of range.
    pub fn build(self) -> Result<Config, DocforgeError> {
        let mut config = Config::defaults();
        let src = || ConfigSource::Programmatic;

        if let Some(provider) = self.provider {
            config.llm.provider = Some(provider);
            config.attribute("llm_provider", src());
        }
        if let Some(retries) = self.max_retries {
            config.llm.max_retries = Some(retries);
            config.attribute("max_retries", src());
        }
        if let Some(delay) = self.retry_base_delay {
            config.llm.retry_base_delay_ms =
                Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
            config.attribute("retry_base_delay_ms", src());
        }
        if let Some(timeout) = self.request_timeout {
            config.llm.request_timeout_secs = Some(timeout.as_secs());
            config.attribute("request_timeout_secs", src());
        }
        if self.gemini_api_key_env.is_some() || self.gemini_endpoint.is_some() {
            if self.gemini_api_key_env.is_some() {
                config.attribute("gemini_api_key_env", src());
            }
            if self.gemini_endpoint.is_some() {
                config.attribute("gemini_endpoint", src());
            }
            config.llm.gemini = Some(GeminiConfig {
                api_key_env: self.gemini_api_key_env,
                endpoint: self.gemini_endpoint,
            });
        }
        if let Some(window) = self.rate_limit_window {
            config.rate_limit.window_ms =
                Some(u64::try_from(window.as_millis()).unwrap_or(u64::MAX));
            config.attribute("rate_limit_window_ms", src());
        }
        if let Some(max) = self.rate_limit_max_requests {
            config.rate_limit.max_requests = Some(max);
            config.attribute("rate_limit_max_requests", src());
        }
        if let Some(dir) = self.output_dir {
            config.export.output_dir = Some(dir);
            config.attribute("output_dir", src());
        }

        config.validate()?;
        Ok(config)
    }
}
