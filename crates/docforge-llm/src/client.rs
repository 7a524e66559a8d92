//! Rate-limited, retrying generation client
//!
//! Per call:
//!
//! 1. The rate limiter is consulted once for the caller's identity; a denial
//!    fails with `RateLimitExceeded` before any attempt.
//! 2. Attempts `1..=max_retries` each invoke the provider once.
//! 3. A failure whose message names an auth or validation problem is fatal and
//!    ends the call at once. Anything else sleeps `base * 2^attempt` and tries
//!    again until attempts run out.
//!
//! Cancellation and the optional deadline are checked before every attempt
//! and raced against each backoff sleep.

use std::sync::Arc;
use std::time::Duration;

use docforge_config::Config;
use docforge_utils::error::LlmError;
use docforge_utils::redaction::redact_error_message;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::rate_limiter::{RateLimitStatus, RateLimiter};
use crate::types::{GenerationProvider, GenerationRequest, GenerationResult};

/// Substrings that mark a provider failure as not worth retrying
const FATAL_MARKERS: &[&str] = &["API key", "401", "403", "INVALID_ARGUMENT"];

/// Whether a provider error message indicates an auth or validation failure.
#[must_use]
pub fn is_fatal_message(message: &str) -> bool {
    FATAL_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Attempt ceiling and backoff base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Sleep after failed attempt `attempt` (1-based): `base * 2^attempt`
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(20))
    }
}

/// Per-call cancellation and deadline
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl CallOptions {
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn deadline_passed(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }
}

/// Generation front door: rate limit, retry, classify.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn GenerationProvider>,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("provider", &self.provider.name())
            .field("limiter", &self.limiter)
            .field("policy", &self.policy)
            .finish()
    }
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn GenerationProvider>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            provider,
            limiter,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy. A ceiling of zero is treated as one attempt.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = RetryPolicy {
            max_retries: policy.max_retries.max(1),
            ..policy
        };
        self
    }

    /// Client wired from configuration: provider per `[llm] provider`, limiter
    /// per `[rate_limit]`, retry policy per `[llm]`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the selected provider cannot be built
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let provider = crate::provider_from_config(config)?;
        let limiter = Arc::new(RateLimiter::from_config(config));
        Ok(Self::new(provider, limiter).with_retry_policy(RetryPolicy {
            max_retries: config.max_retries(),
            base_delay: config.retry_base_delay(),
        }))
    }

    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.provider.is_mock()
    }

    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    #[must_use]
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    #[must_use]
    pub fn rate_limit_status(&self, identity: &str) -> RateLimitStatus {
        self.limiter.status(identity)
    }

    /// Generate text for `identity` with no deadline or cancellation.
    ///
    /// # Errors
    ///
    /// `RateLimitExceeded` or `GenerationFailed`.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        identity: &str,
    ) -> Result<GenerationResult, LlmError> {
        self.generate_with(request, identity, &CallOptions::default())
            .await
    }

    /// Generate text, honoring the caller's deadline and cancellation token.
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded` when the identity has no slot left
    /// - `GenerationFailed` on a fatal failure or once attempts run out
    /// - `Cancelled` / `DeadlineExceeded` when the caller gives up
    pub async fn generate_with(
        &self,
        request: &GenerationRequest,
        identity: &str,
        options: &CallOptions,
    ) -> Result<GenerationResult, LlmError> {
        if !self.limiter.allow(identity) {
            let status = self.limiter.status(identity);
            return Err(LlmError::RateLimitExceeded {
                identity: identity.to_string(),
                reset_in_ms: status.reset_in_ms,
            });
        }

        let provider = self.provider.name();
        let max_retries = self.policy.max_retries;
        let mut last_error = String::new();

        for attempt in 1..=max_retries {
            if options.is_cancelled() {
                return Err(LlmError::Cancelled {
                    attempts: attempt - 1,
                });
            }
            if options.deadline_passed(Instant::now()) {
                return Err(LlmError::DeadlineExceeded {
                    attempts: attempt - 1,
                });
            }

            debug!(provider, attempt, max_retries, "Generation attempt");

            match self.provider.call_once(request).await {
                Ok(text) => {
                    info!(provider, attempt, "Generation succeeded");
                    return Ok(GenerationResult {
                        text: text.trim().to_string(),
                        sourced_from_mock: self.provider.is_mock(),
                    });
                }
                Err(e) => {
                    let message = redact_error_message(&e.to_string());

                    if is_fatal_message(&message) {
                        warn!(provider, attempt, error = %message, "Fatal generation error, not retrying");
                        return Err(LlmError::GenerationFailed {
                            attempts: attempt,
                            message,
                        });
                    }

                    if attempt < max_retries {
                        let delay = self.policy.backoff(attempt);
                        warn!(
                            provider,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %message,
                            "Generation attempt failed, retrying"
                        );
                        self.backoff(delay, attempt, options).await?;
                    } else {
                        warn!(provider, attempt, error = %message, "Generation attempt failed");
                    }

                    last_error = message;
                }
            }
        }

        Err(LlmError::GenerationFailed {
            attempts: max_retries,
            message: last_error,
        })
    }

    /// Sleep for `delay` unless the caller gives up first.
    async fn backoff(
        &self,
        delay: Duration,
        attempt: u32,
        options: &CallOptions,
    ) -> Result<(), LlmError> {
        let wake_at = Instant::now() + delay;

        // Fail now rather than wake up after the deadline.
        if options.deadline.is_some_and(|d| wake_at > d) {
            return Err(LlmError::DeadlineExceeded { attempts: attempt });
        }

        match &options.cancel {
            Some(token) => {
                tokio::select! {
                    () = token.cancelled() => Err(LlmError::Cancelled { attempts: attempt }),
                    () = tokio::time::sleep_until(wake_at) => Ok(()),
                }
            }
            None => {
                tokio::time::sleep_until(wake_at).await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::mock_provider::MockProvider;

    /// Provider that replays a fixed script of outcomes
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: AtomicU32,
        cancel_on_failure: Option<CancellationToken>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<String, LlmError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
                cancel_on_failure: None,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn call_once(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::Transport("script exhausted".to_string())));
            if next.is_err()
                && let Some(token) = &self.cancel_on_failure
            {
                token.cancel();
            }
            next
        }
    }

    fn transient() -> Result<String, LlmError> {
        Err(LlmError::Http {
            provider: "Gemini".to_string(),
            status: 503,
            body: "overloaded".to_string(),
        })
    }

    fn client_for(provider: Arc<ScriptedProvider>) -> GenerationClient {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 100));
        GenerationClient::new(provider, limiter)
    }

    #[test]
    fn test_fatal_markers() {
        assert!(is_fatal_message("Gemini API error: 401 - unauthorized"));
        assert!(is_fatal_message("Gemini API error: 403 - forbidden"));
        assert!(is_fatal_message("API key not valid"));
        assert!(is_fatal_message("status: INVALID_ARGUMENT"));
        assert!(!is_fatal_message("Gemini API error: 503 - overloaded"));
        assert!(!is_fatal_message("api key lowercase does not match"));
    }

    #[test]
    fn test_backoff_doubles_from_two_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_two_backoffs() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            transient(),
            transient(),
            Ok("  final text \n".to_string()),
        ]));
        let client = client_for(provider.clone());

        let start = Instant::now();
        let result = client
            .generate(&GenerationRequest::new("prompt"), "alice")
            .await
            .unwrap();

        assert_eq!(result.text, "final text");
        assert!(!result.sourced_from_mock);
        assert_eq!(provider.calls(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(6), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(6_100), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_stops_after_one_attempt() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(LlmError::Http {
                provider: "Gemini".to_string(),
                status: 401,
                body: "unauthorized".to_string(),
            }),
            Ok("never reached".to_string()),
        ]));
        let client = client_for(provider.clone());

        let start = Instant::now();
        let err = client
            .generate(&GenerationRequest::new("prompt"), "alice")
            .await
            .unwrap_err();

        assert_eq!(provider.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        match err {
            LlmError::GenerationFailed { attempts, message } => {
                assert_eq!(attempts, 1);
                assert!(message.contains("401"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_api_key_is_fatal() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(
            LlmError::Misconfiguration("Gemini API key not found".to_string()),
        )]));
        let client = client_for(provider.clone());

        let err = client
            .generate(&GenerationRequest::new("prompt"), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::GenerationFailed { attempts: 1, .. }));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_carry_last_message() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            transient(),
            Err(LlmError::Transport("connection reset".to_string())),
            Err(LlmError::EmptyResponse {
                provider: "Gemini".to_string(),
            }),
        ]));
        let client = client_for(provider.clone());

        let start = Instant::now();
        let err = client
            .generate(&GenerationRequest::new("prompt"), "alice")
            .await
            .unwrap_err();

        assert_eq!(provider.calls(), 3);
        assert_eq!(
            err,
            LlmError::GenerationFailed {
                attempts: 3,
                message: "Empty or invalid response format from Gemini API".to_string(),
            }
        );
        // No sleep after the final attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_rate_limit_denial_skips_provider() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("one".to_string())]));
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 1));
        let client = GenerationClient::new(provider.clone(), limiter);

        client
            .generate(&GenerationRequest::new("prompt"), "alice")
            .await
            .unwrap();
        let err = client
            .generate(&GenerationRequest::new("prompt"), "alice")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::RateLimitExceeded { ref identity, .. } if identity == "alice"));
        assert_eq!(provider.calls(), 1);
        assert_eq!(client.rate_limit_status("alice").remaining, 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("x".to_string())]));
        let client = client_for(provider.clone());
        let token = CancellationToken::new();
        token.cancel();

        let err = client
            .generate_with(
                &GenerationRequest::new("prompt"),
                "alice",
                &CallOptions::default().with_cancellation(token),
            )
            .await
            .unwrap_err();

        assert_eq!(err, LlmError::Cancelled { attempts: 0 });
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_backoff() {
        let token = CancellationToken::new();
        let provider = Arc::new(ScriptedProvider {
            cancel_on_failure: Some(token.clone()),
            ..ScriptedProvider::new(vec![transient(), Ok("late".to_string())])
        });
        let client = client_for(provider.clone());

        let start = Instant::now();
        let err = client
            .generate_with(
                &GenerationRequest::new("prompt"),
                "alice",
                &CallOptions::default().with_cancellation(token),
            )
            .await
            .unwrap_err();

        assert_eq!(err, LlmError::Cancelled { attempts: 1 });
        assert_eq!(provider.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_stops_before_backoff_past_it() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            transient(),
            transient(),
            Ok("too late".to_string()),
        ]));
        let client = client_for(provider.clone());

        let err = client
            .generate_with(
                &GenerationRequest::new("prompt"),
                "alice",
                &CallOptions::default().with_timeout(Duration::from_secs(3)),
            )
            .await
            .unwrap_err();

        // First backoff (2s) fits, the second (4s) would overrun.
        assert_eq!(err, LlmError::DeadlineExceeded { attempts: 2 });
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_provider_results_are_flagged() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 10));
        let client = GenerationClient::new(Arc::new(MockProvider::new()), limiter);

        let result = client
            .generate(&GenerationRequest::new("hello"), "alice")
            .await
            .unwrap();
        assert!(result.sourced_from_mock);
        assert!(result.text.starts_with("Mock response generated"));
    }

    #[test]
    fn test_zero_retry_ceiling_means_one_attempt() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let client = client_for(provider).with_retry_policy(RetryPolicy {
            max_retries: 0,
            base_delay: Duration::from_millis(1),
        });
        assert_eq!(client.policy().max_retries, 1);
    }
}
