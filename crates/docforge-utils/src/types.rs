//! Domain values shared across the workspace

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ExportError;

/// One titled block of a project, in the order the owning project stores it.
///
/// Sections arrive from an external store as an ordered sequence. Nothing in
/// docforge reorders, merges or rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text; order-significant within the sequence
    pub title: String,
    /// Generated or edited body text, if any has been produced yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Section {
    /// Create a section with a title and no content yet
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }

    /// Attach body content
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Body content, or `None` when there is nothing visible to show.
    ///
    /// Whitespace-only content counts as absent, not just `None` or `""`:
    /// a slide body made of blanks would render as an empty text box.
    #[must_use]
    pub fn content_text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Output container requested for an export.
///
/// Parsing accepts the long names and the file extensions, ignoring ASCII case:
///
/// ```rust
/// use docforge_utils::DocumentType;
///
/// assert_eq!(DocumentType::parse("docx").unwrap(), DocumentType::Document);
/// assert_eq!(DocumentType::parse("Presentation").unwrap(), DocumentType::Presentation);
/// assert!(DocumentType::parse("pdf").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum DocumentType {
    /// Word processing document (`.docx`)
    #[serde(alias = "docx")]
    #[strum(to_string = "document", serialize = "docx")]
    Document,
    /// Slide deck (`.pptx`)
    #[serde(alias = "pptx")]
    #[strum(to_string = "presentation", serialize = "pptx")]
    Presentation,
}

impl DocumentType {
    /// Parse a caller-supplied selector.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::UnsupportedDocumentType` for anything other than
    /// `document`, `docx`, `presentation` or `pptx`.
    pub fn parse(value: &str) -> Result<Self, ExportError> {
        Self::from_str(value.trim())
            .map_err(|_| ExportError::UnsupportedDocumentType(value.to_string()))
    }

    /// File extension without the leading dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Document => "docx",
            Self::Presentation => "pptx",
        }
    }

    /// MIME type of the container
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Document => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Presentation => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Number of titles an outline request asks the provider for
    #[must_use]
    pub const fn expected_outline_len(self) -> usize {
        match self {
            Self::Document => 5,
            Self::Presentation => 8,
        }
    }

    /// Human-readable container name used in failure messages
    #[must_use]
    pub const fn format_name(self) -> &'static str {
        match self {
            Self::Document => "Word document",
            Self::Presentation => "PowerPoint presentation",
        }
    }
}

/// Where an effective configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Command-line flag (highest precedence)
    Cli,
    /// `DOCFORGE_*` environment variable
    Env,
    /// Value read from a config file
    ConfigFile(PathBuf),
    /// Set through `Config::builder()`
    Programmatic,
    /// Built-in default (lowest precedence)
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Env => write!(f, "env"),
            Self::ConfigFile(path) => write!(f, "config ({})", path.display()),
            Self::Programmatic => write!(f, "programmatic"),
            Self::Defaults => write!(f, "default"),
        }
    }
}
