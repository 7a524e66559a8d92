use docforge_utils::error::{ConfigError, DocforgeError};

use super::{Config, ProviderKind};

fn invalid(key: &str, value: impl Into<String>) -> DocforgeError {
    DocforgeError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    })
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), DocforgeError> {
        if let Some(provider) = self.llm.provider.as_deref()
            && provider.trim().parse::<ProviderKind>().is_err()
        {
            return Err(invalid(
                "llm_provider",
                format!("unknown provider '{provider}' (expected auto, mock or gemini)"),
            ));
        }

        if let Some(max_retries) = self.llm.max_retries {
            if max_retries == 0 {
                return Err(invalid("max_retries", "must be at least 1"));
            }
            if max_retries > 10 {
                return Err(invalid("max_retries", "exceeds maximum limit of 10"));
            }
        }

        if let Some(delay) = self.llm.retry_base_delay_ms
            && delay > 60_000
        {
            return Err(invalid(
                "retry_base_delay_ms",
                "exceeds maximum limit of 60000 ms",
            ));
        }

        if let Some(timeout) = self.llm.request_timeout_secs {
            if timeout == 0 {
                return Err(invalid("request_timeout_secs", "must be greater than 0"));
            }
            if timeout > 600 {
                return Err(invalid(
                    "request_timeout_secs",
                    "exceeds maximum limit of 600 seconds",
                ));
            }
        }

        if let Some(gemini) = &self.llm.gemini {
            if gemini
                .api_key_env
                .as_deref()
                .is_some_and(|v| v.trim().is_empty())
            {
                return Err(invalid("gemini_api_key_env", "must not be empty"));
            }
            if let Some(endpoint) = gemini.endpoint.as_deref()
                && !(endpoint.starts_with("https://") || endpoint.starts_with("http://"))
            {
                return Err(invalid(
                    "gemini_endpoint",
                    format!("'{endpoint}' is not an http(s) URL"),
                ));
            }
        }

        if self.rate_limit.window_ms == Some(0) {
            return Err(invalid("rate_limit_window_ms", "must be greater than 0"));
        }
        if self.rate_limit.max_requests == Some(0) {
            return Err(invalid("rate_limit_max_requests", "must be greater than 0"));
        }

        Ok(())
    }
}
