//! Export dispatch: pick the assembler for a document type and describe the result

use chrono::NaiveDate;
use docforge_utils::error::ExportError;
use docforge_utils::types::{DocumentType, Section};
use tracing::info;

use crate::assembler::Assembler;
use crate::docx::DocumentAssembler;
use crate::pptx::PresentationAssembler;

/// Filename stem used when a topic has nothing left after slugging
pub const UNTITLED_SLUG: &str = "untitled";

/// A finished container ready to hand to a delivery layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename_extension: &'static str,
    /// `{slug}.{extension}`
    pub filename: String,
}

impl ExportArtifact {
    /// `Content-Disposition` value for an HTTP download
    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Filesystem-safe stem for `topic`.
///
/// Lower-cases, then replaces every character outside `[a-z0-9]` with `_`.
/// An empty topic has no characters to keep and falls back to
/// [`UNTITLED_SLUG`], so a filename is never a bare extension.
///
/// ```
/// use docforge_export::slugify;
///
/// assert_eq!(slugify("Q3 Report: Sales & Ops"), "q3_report__sales___ops");
/// assert_eq!(slugify(""), "untitled");
/// ```
#[must_use]
pub fn slugify(topic: &str) -> String {
    let slug: String = topic
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect();

    if slug.is_empty() {
        UNTITLED_SLUG.to_string()
    } else {
        slug
    }
}

/// Routes an export to the DOCX or PPTX assembler
#[derive(Debug, Clone, Default)]
pub struct ExportDispatcher {
    document: DocumentAssembler,
    presentation: PresentationAssembler,
}

impl ExportDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the generation date embedded by both assemblers
    #[must_use]
    pub fn with_date(self, date: NaiveDate) -> Self {
        Self {
            document: self.document.with_date(date),
            presentation: self.presentation.with_date(date),
        }
    }

    #[must_use]
    pub fn assembler(&self, document_type: DocumentType) -> &dyn Assembler {
        match document_type {
            DocumentType::Document => &self.document,
            DocumentType::Presentation => &self.presentation,
        }
    }

    /// Assemble `sections` under `topic` into the container for `document_type`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::AssemblyFailure` if the package cannot be written.
    pub fn export(
        &self,
        topic: &str,
        document_type: DocumentType,
        sections: &[Section],
    ) -> Result<ExportArtifact, ExportError> {
        let bytes = self.assembler(document_type).assemble(topic, sections)?;
        let extension = document_type.extension();
        let filename = format!("{}.{extension}", slugify(topic));

        info!(
            document_type = %document_type,
            sections = sections.len(),
            bytes = bytes.len(),
            filename = %filename,
            "Export assembled"
        );

        Ok(ExportArtifact {
            bytes,
            content_type: document_type.content_type(),
            filename_extension: extension,
            filename,
        })
    }

    /// Like [`export`](Self::export) with the type given as text.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::UnsupportedDocumentType` for an unknown selector,
    /// otherwise as [`export`](Self::export).
    pub fn export_named(
        &self,
        topic: &str,
        document_type: &str,
        sections: &[Section],
    ) -> Result<ExportArtifact, ExportError> {
        let document_type = DocumentType::parse(document_type)?;
        self.export(topic, document_type, sections)
    }
}
