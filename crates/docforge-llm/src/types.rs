//! Core types for text generation
//!
//! A [`GenerationProvider`] makes exactly one attempt per call. Retry,
//! backoff and rate limiting live one level up, in `GenerationClient`.

use async_trait::async_trait;
use docforge_utils::error::LlmError;
use serde::{Deserialize, Serialize};

/// Default `maxOutputTokens` sent to the provider
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2000;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One text-generation request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    /// Request with the default token ceiling and temperature
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text produced by a successful generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Trimmed provider output
    pub text: String,
    /// True when the canned offline provider answered
    pub sourced_from_mock: bool,
}

/// A text-generation backend.
///
/// Implementations make a single attempt and report failure as an
/// [`LlmError`] whose display text is what the retry classifier inspects.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short provider name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Whether results come from canned data rather than a live model
    fn is_mock(&self) -> bool {
        false
    }

    /// Make one attempt.
    ///
    /// # Errors
    ///
    /// Any provider-level failure: `Http`, `Transport`, `Timeout`,
    /// `EmptyResponse` or `Misconfiguration`.
    async fn call_once(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}
