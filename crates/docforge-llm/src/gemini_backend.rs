//! Gemini `generateContent` provider
//!
//! `POST <endpoint>?key=<api key>` with a single user turn. The answer text is
//! read from `candidates[0].content.parts[0].text`.

use async_trait::async_trait;
use docforge_config::Config;
use docforge_utils::error::LlmError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::http_client::HttpClient;
use crate::types::{GenerationProvider, GenerationRequest};

/// Provider name used in error messages
const PROVIDER_LABEL: &str = "Gemini";

/// Location of the answer text in a `generateContent` response
const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: [GeminiPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl<'a> GeminiRequest<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            contents: [GeminiContent {
                role: "user",
                parts: [GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

/// Live provider backed by the Gemini REST API
#[derive(Clone)]
pub struct GeminiProvider {
    client: Arc<HttpClient>,
    endpoint: reqwest::Url,
    api_key: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GeminiProvider {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the endpoint is not a valid URL
    /// or the HTTP client cannot be constructed
    pub fn new(
        api_key: impl Into<String>,
        endpoint: &str,
        request_timeout: Duration,
    ) -> Result<Self, LlmError> {
        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| {
            LlmError::Misconfiguration(format!("Invalid Gemini endpoint '{endpoint}': {e}"))
        })?;

        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            endpoint,
            api_key: api_key.into(),
            request_timeout,
        })
    }

    /// Build from `[llm.gemini]`, reading the key from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the API key variable is unset or empty
    pub fn new_from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key_env = config.gemini_api_key_env();
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Misconfiguration(format!(
                    "Gemini API key not found in environment variable '{api_key_env}'. \
                     Set it, configure a different api_key_env in [llm.gemini], \
                     or use --provider mock."
                ))
            })?;

        Self::new(api_key, config.gemini_endpoint(), config.request_timeout())
    }

    fn extract_text(body: &serde_json::Value) -> Result<String, LlmError> {
        body.pointer(TEXT_POINTER)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| LlmError::EmptyResponse {
                provider: PROVIDER_LABEL.to_string(),
            })
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn call_once(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = GeminiRequest::from_request(request);

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let builder = self.client.inner().post(url).json(&body);

        let response = self
            .client
            .send(builder, self.request_timeout, PROVIDER_LABEL)
            .await?;

        let json: serde_json::Value = response.json().await.map_err(|_| {
            LlmError::EmptyResponse {
                provider: PROVIDER_LABEL.to_string(),
            }
        })?;

        let text = Self::extract_text(&json)?;
        debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }
}
