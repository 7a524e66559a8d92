//! Shared HTTP client for HTTP-based providers
//!
//! One `reqwest::Client` per provider instance, reused across attempts. This
//! layer sends a single request and maps the outcome onto `LlmError`; retries
//! belong to `GenerationClient` so that backoff, cancellation and the fatal
//! classifier all live in one place.

use docforge_utils::error::LlmError;
use docforge_utils::redaction::redact_error_message;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Upper bound on any per-request timeout (10 minutes)
const DEFAULT_MAX_HTTP_TIMEOUT: Duration = Duration::from_secs(600);

/// Connect timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 2000;

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
    max_timeout: Duration,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, LlmError> {
        Self::with_max_timeout(DEFAULT_MAX_HTTP_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn with_max_timeout(max_timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
            max_timeout,
        })
    }

    /// Underlying client, for building requests
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Send one request with timeout `min(request_timeout, max_timeout)`.
    ///
    /// Non-2xx responses become `LlmError::Http` carrying the status code and
    /// the (truncated) response body.
    ///
    /// # Errors
    ///
    /// - `LlmError::Http` for non-2xx status
    /// - `LlmError::Timeout` when the timeout elapses
    /// - `LlmError::Transport` for connection and protocol failures
    pub async fn send(
        &self,
        request_builder: reqwest::RequestBuilder,
        request_timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, LlmError> {
        let effective_timeout = request_timeout.min(self.max_timeout);

        let request = request_builder
            .timeout(effective_timeout)
            .build()
            .map_err(|e| {
                LlmError::Transport(format!(
                    "Failed to build request: {}",
                    redact_error_message(&e.without_url().to_string())
                ))
            })?;

        debug!(
            provider = provider_name,
            timeout_secs = effective_timeout.as_secs(),
            "Executing HTTP request"
        );

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(LlmError::Timeout {
                    duration: effective_timeout,
                });
            }
            Err(e) => {
                return Err(LlmError::Transport(format!(
                    "{} request failed: {}",
                    provider_name,
                    redact_error_message(&e.without_url().to_string())
                )));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
        Err(LlmError::Http {
            provider: provider_name.to_string(),
            status: status.as_u16(),
            body: redact_error_message(&body),
        })
    }
}
