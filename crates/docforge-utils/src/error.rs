use std::time::Duration;
use thiserror::Error;

use crate::exit_codes::ExitCode;
use crate::redaction::redact_error_message;

/// Library-level error type for docforge operations.
///
/// Each concern owns a narrower enum (`LlmError`, `ExtractionError`,
/// `ExportError`, `ConfigError`) that converts into this one with `?`.
///
/// # Mapping
///
/// | Variant | Exit code | HTTP status |
/// |---------|-----------|-------------|
/// | `Config`, `InvalidInput` | 2 | 400 |
/// | `Llm(RateLimitExceeded)` | 75 | 429 |
/// | `Llm(..)` otherwise | 70 | 500 |
/// | `Extraction` | 70 | 500 |
/// | `Export(UnsupportedDocumentType)` | 2 | 400 |
/// | `Export(AssemblyFailure)` | 73 | 500 |
/// | `Io` | 1 | 500 |
#[derive(Error, Debug)]
pub enum DocforgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

/// Errors raised while producing text through a generation provider.
///
/// Provider-level variants (`Http`, `Transport`, `Timeout`, `EmptyResponse`,
/// `Misconfiguration`) come out of a single attempt. The generation client turns
/// them into `GenerationFailed` once it stops retrying, so callers of
/// `GenerationClient::generate` only ever see `RateLimitExceeded`,
/// `GenerationFailed`, `Cancelled` or `DeadlineExceeded`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The identity used up its request window
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded { identity: String, reset_in_ms: u64 },

    /// Retries exhausted, or the failure was classified as fatal
    #[error("Failed to generate content after {attempts} attempt(s). Last error: {message}")]
    GenerationFailed { attempts: u32, message: String },

    /// The provider answered but carried no usable text
    #[error("Empty or invalid response format from {provider} API")]
    EmptyResponse { provider: String },

    /// Non-2xx response; the status code is part of the message
    #[error("{provider} API error: {status} - {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    /// Connection-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// A single attempt exceeded its HTTP timeout
    #[error("Request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Provider could not be configured (for example, the API key is missing)
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// The caller's cancellation token fired
    #[error("Generation cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    /// The caller's deadline passed before another attempt could start
    #[error("Generation deadline exceeded after {attempts} attempt(s)")]
    DeadlineExceeded { attempts: u32 },
}

/// Errors from turning generated text into an outline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Failed to extract outline items from generated text. Please try again.")]
    EmptyOutline,
}

/// Errors from building an export artifact
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error(
        "Unsupported document type '{0}'. Supported types: document (docx), presentation (pptx)"
    )]
    UnsupportedDocumentType(String),

    /// The package writer failed; the root cause is logged, not carried
    #[error("Failed to generate {format}")]
    AssemblyFailure { format: String },
}

/// User-facing reporting: message, background and what to try next.
pub trait UserFriendlyError {
    /// One-line message suitable for a terminal or an API response body
    fn user_message(&self) -> String;

    /// Background on why this class of error happens
    fn context(&self) -> Option<String>;

    /// Concrete next steps
    fn suggestions(&self) -> Vec<String>;
}

impl UserFriendlyError for DocforgeError {
    fn user_message(&self) -> String {
        redact_error_message(&self.to_string())
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(_) => {
                Some("Configuration is read from CLI flags, DOCFORGE_* variables and .docforge/config.toml.".to_string())
            }
            Self::Llm(LlmError::RateLimitExceeded { reset_in_ms, .. }) => Some(format!(
                "Each identity may make a limited number of generation requests per window; this window resets in {}s.",
                reset_in_ms.div_ceil(1000)
            )),
            Self::Llm(_) => Some(
                "The text-generation provider failed or returned no usable text.".to_string(),
            ),
            Self::Extraction(_) => Some(
                "The provider answered, but no line of the answer looked like a title.".to_string(),
            ),
            Self::Export(ExportError::AssemblyFailure { .. }) => Some(
                "The document package could not be written. Details are in the log.".to_string(),
            ),
            Self::Export(ExportError::UnsupportedDocumentType(_)) | Self::InvalidInput(_) => None,
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(_) => vec![
                "Run `docforge config` to see effective values and their sources".to_string(),
            ],
            Self::Llm(LlmError::RateLimitExceeded { .. }) => {
                vec!["Wait for the window to reset, then retry".to_string()]
            }
            Self::Llm(LlmError::GenerationFailed { message, .. })
                if message.contains("API key") || message.contains("401") =>
            {
                vec![
                    "Check that GEMINI_API_KEY (or [llm.gemini] api_key_env) is set and valid"
                        .to_string(),
                    "Use --provider mock to work offline".to_string(),
                ]
            }
            Self::Llm(_) | Self::Extraction(_) => vec![
                "Retry the request".to_string(),
                "Run with --verbose to see each attempt".to_string(),
            ],
            Self::Export(ExportError::UnsupportedDocumentType(_)) => {
                vec!["Use --type document or --type presentation".to_string()]
            }
            Self::Export(ExportError::AssemblyFailure { .. }) | Self::Io(_) => {
                vec!["Run with --verbose to see the underlying cause".to_string()]
            }
            Self::InvalidInput(_) => Vec::new(),
        }
    }
}

impl DocforgeError {
    /// Message, context and suggestions formatted for terminal output
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::InvalidInput(_) => ExitCode::CLI_ARGS,
            Self::Llm(LlmError::RateLimitExceeded { .. }) => ExitCode::RATE_LIMITED,
            Self::Llm(LlmError::Misconfiguration(_)) => ExitCode::CLI_ARGS,
            Self::Llm(_) | Self::Extraction(_) => ExitCode::GENERATION_FAILURE,
            Self::Export(ExportError::UnsupportedDocumentType(_)) => ExitCode::CLI_ARGS,
            Self::Export(ExportError::AssemblyFailure { .. }) => ExitCode::EXPORT_FAILURE,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }

    /// Map this error to the status a delivery layer should answer with
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Llm(LlmError::RateLimitExceeded { .. }) => 429,
            Self::Config(_)
            | Self::InvalidInput(_)
            | Self::Export(ExportError::UnsupportedDocumentType(_)) => 400,
            _ => 500,
        }
    }
}
