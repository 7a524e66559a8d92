use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    source.unwrap_or(&ConfigSource::Defaults).to_string()
}

impl Config {
    /// Effective configuration as `key -> (value, source)`, ordered by key.
    ///
    /// Backs `docforge config`. The API key itself is never listed, only the
    /// name of the variable it is read from and whether that variable is set.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut out = BTreeMap::new();
        let mut add = |key: &str, value: String| {
            let source = source_label(self.source_attribution.get(key));
            out.insert(key.to_string(), (value, source));
        };

        add("llm_provider", self.provider_kind().to_string());
        add("max_retries", self.max_retries().to_string());
        add(
            "retry_base_delay_ms",
            self.retry_base_delay().as_millis().to_string(),
        );
        add(
            "request_timeout_secs",
            self.request_timeout().as_secs().to_string(),
        );
        add("gemini_api_key_env", self.gemini_api_key_env().to_string());
        add("gemini_endpoint", self.gemini_endpoint().to_string());
        add(
            "rate_limit_window_ms",
            self.rate_limit_window().as_millis().to_string(),
        );
        add(
            "rate_limit_max_requests",
            self.rate_limit_max_requests().to_string(),
        );
        add("output_dir", self.output_dir().display().to_string());

        out
    }
}
