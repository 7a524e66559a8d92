//! Foundation utilities shared by every docforge crate
//!
//! - `types`: domain values that cross crate boundaries (`Section`, `DocumentType`)
//! - `error`: the error taxonomy and its exit-code / HTTP-status mapping
//! - `exit_codes`: stable process exit codes for the CLI
//! - `logging`: tracing subscriber setup and span helpers
//! - `redaction`: scrubbing credentials out of error text before it is logged

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

pub use error::{
    ConfigError, DocforgeError, ExportError, ExtractionError, LlmError, UserFriendlyError,
};
pub use exit_codes::ExitCode;
pub use types::{ConfigSource, DocumentType, Section};
