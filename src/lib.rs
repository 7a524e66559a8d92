//! docforge - outline, draft and export AI-authored documents
//!
//! A topic becomes an outline, each outline entry becomes a drafted section,
//! and the sections are packaged as a Word document or a PowerPoint deck.
//!
//! docforge can be used in two ways:
//! - **CLI**: run `docforge --help`
//! - **Library**: build a [`Workflow`] from a [`Config`] and call it from your
//!   own request handlers
//!
//! # Quick Start (Library)
//!
//! ```no_run
//! use docforge::{Config, DocumentType, Workflow};
//!
//! # async fn demo() -> Result<(), docforge::DocforgeError> {
//! let config = Config::builder().provider("mock").build()?;
//! let workflow = Workflow::from_config(&config)?;
//!
//! let draft = workflow
//!     .draft("Renewable energy adoption", DocumentType::Document, "user-42")
//!     .await?;
//! std::fs::write(&draft.artifact.filename, &draft.artifact.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! - `docforge-llm`: rate limiter, providers, retrying generation client
//! - `docforge-extraction`: outline extraction from free-form text
//! - `docforge-export`: DOCX and PPTX assembly
//! - `docforge-config`: configuration discovery and precedence
//! - `docforge-utils`: shared types, errors, exit codes, logging

pub mod cli;
pub mod workflow;

pub use workflow::{Draft, ExportJob, Workflow};

pub use docforge_config::{CliArgs, Config, ConfigBuilder, ConfigSource};
pub use docforge_export::{ExportArtifact, ExportDispatcher};
pub use docforge_llm::{GenerationClient, RateLimitStatus, RateLimiter};
pub use docforge_utils::{DocforgeError, DocumentType, ExitCode, Section};
