//! End-to-end operations: outline, section drafting, refinement and export
//!
//! [`Workflow`] owns a [`GenerationClient`] (and through it the shared rate
//! limiter) plus an [`ExportDispatcher`]. Every generating call is charged to
//! the caller-supplied identity.

use serde::Deserialize;
use tracing::{Instrument, debug, info};

use docforge_config::Config;
use docforge_export::{ExportArtifact, ExportDispatcher};
use docforge_extraction::extract_outline_expecting;
use docforge_llm::{GenerationClient, GenerationRequest, GenerationResult, RateLimitStatus, prompts};
use docforge_utils::error::DocforgeError;
use docforge_utils::logging::operation_span;
use docforge_utils::types::{DocumentType, Section};

/// Everything an export needs: a topic, a container and ordered sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub topic: String,
    pub document_type: DocumentType,
    pub sections: Vec<Section>,
}

/// On-disk project shape; `document_type` stays text so an unknown value
/// surfaces as `UnsupportedDocumentType` rather than a JSON error.
#[derive(Deserialize)]
struct ProjectFile {
    topic: String,
    document_type: String,
    #[serde(default)]
    sections: Vec<Section>,
}

impl ExportJob {
    pub fn new(topic: impl Into<String>, document_type: DocumentType, sections: Vec<Section>) -> Self {
        Self {
            topic: topic.into(),
            document_type,
            sections,
        }
    }

    /// Parse a project file: `{"topic", "document_type", "sections": [{"title", "content"?}]}`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for malformed JSON, `Export(UnsupportedDocumentType)`
    /// for an unknown document type.
    pub fn from_json(json: &str) -> Result<Self, DocforgeError> {
        let project: ProjectFile = serde_json::from_str(json)
            .map_err(|e| DocforgeError::InvalidInput(format!("invalid project file: {e}")))?;
        let document_type = DocumentType::parse(&project.document_type)?;
        Ok(Self::new(project.topic, document_type, project.sections))
    }

    /// Check the job and assemble it with `dispatcher`.
    ///
    /// No generation provider is involved, so this works without one.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank topic or section title, or the export failure.
    pub fn run(&self, dispatcher: &ExportDispatcher) -> Result<ExportArtifact, DocforgeError> {
        require_text("topic", &self.topic)?;
        for section in &self.sections {
            require_text("section title", &section.title)?;
        }

        let _span = operation_span("export", "-").entered();
        Ok(dispatcher.export(&self.topic, self.document_type, &self.sections)?)
    }
}

/// Result of [`Workflow::draft`]
#[derive(Debug, Clone)]
pub struct Draft {
    pub artifact: ExportArtifact,
    /// Sections in outline order, each with generated content
    pub sections: Vec<Section>,
}

fn require_text(field: &str, value: &str) -> Result<(), DocforgeError> {
    if value.trim().is_empty() {
        return Err(DocforgeError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Facade over generation, extraction and export
#[derive(Debug)]
pub struct Workflow {
    client: GenerationClient,
    dispatcher: ExportDispatcher,
}

impl Workflow {
    pub fn new(client: GenerationClient, dispatcher: ExportDispatcher) -> Self {
        Self { client, dispatcher }
    }

    /// Workflow with the provider, limiter and retry policy from `config`.
    ///
    /// # Errors
    ///
    /// Fails when the configured provider cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, DocforgeError> {
        let client = GenerationClient::from_config(config)?;
        Ok(Self::new(client, ExportDispatcher::new()))
    }

    #[must_use]
    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    /// Send an arbitrary prompt with the default token ceiling and temperature.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank prompt, otherwise any generation failure.
    pub async fn generate_text(
        &self,
        prompt: &str,
        identity: &str,
    ) -> Result<GenerationResult, DocforgeError> {
        require_text("prompt", prompt)?;
        let request = GenerationRequest::new(prompt);
        Ok(self
            .client
            .generate(&request, identity)
            .instrument(operation_span("generate", identity))
            .await?)
    }

    /// Ask for section or slide titles for `topic`.
    ///
    /// A count other than 5 (document) or 8 (presentation) is logged, not rejected.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank topic, any generation failure, or
    /// `EmptyOutline` when no titles can be read from the response.
    pub async fn suggest_outline(
        &self,
        topic: &str,
        document_type: DocumentType,
        identity: &str,
    ) -> Result<Vec<String>, DocforgeError> {
        require_text("topic", topic)?;

        async {
            let request = prompts::outline_prompt(topic, document_type);
            let result = self.client.generate(&request, identity).await?;
            let titles =
                extract_outline_expecting(&result.text, document_type.expected_outline_len())?;
            info!(
                document_type = %document_type,
                count = titles.len(),
                mock = result.sourced_from_mock,
                "Outline suggested"
            );
            Ok::<_, DocforgeError>(titles)
        }
        .instrument(operation_span("outline", identity))
        .await
    }

    /// Draft the body of one section.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank topic or title, otherwise any generation failure.
    pub async fn generate_section(
        &self,
        topic: &str,
        section_title: &str,
        identity: &str,
    ) -> Result<String, DocforgeError> {
        require_text("topic", topic)?;
        require_text("section title", section_title)?;

        let request = prompts::section_prompt(topic, section_title);
        let result = self
            .client
            .generate(&request, identity)
            .instrument(operation_span("section", identity))
            .await?;
        debug!(section = section_title, chars = result.text.len(), "Section drafted");
        Ok(result.text)
    }

    /// Rework existing content according to `instruction`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for blank content or instruction, otherwise any generation failure.
    pub async fn refine_section(
        &self,
        current_content: &str,
        instruction: &str,
        identity: &str,
    ) -> Result<String, DocforgeError> {
        require_text("content", current_content)?;
        require_text("instruction", instruction)?;

        let request = prompts::refine_prompt(current_content, instruction);
        let result = self
            .client
            .generate(&request, identity)
            .instrument(operation_span("refine", identity))
            .await?;
        Ok(result.text)
    }

    /// Assemble `job` into its container.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank topic or section title, or the export failure.
    pub fn export(&self, job: &ExportJob) -> Result<ExportArtifact, DocforgeError> {
        job.run(&self.dispatcher)
    }

    /// Outline, draft every section in outline order, then export.
    ///
    /// Stops at the first failure; nothing is exported unless every section
    /// was generated.
    ///
    /// # Errors
    ///
    /// Any error from the outline, section or export steps.
    pub async fn draft(
        &self,
        topic: &str,
        document_type: DocumentType,
        identity: &str,
    ) -> Result<Draft, DocforgeError> {
        let titles = self.suggest_outline(topic, document_type, identity).await?;

        let mut sections = Vec::with_capacity(titles.len());
        for (i, title) in titles.into_iter().enumerate() {
            debug!(index = i + 1, title = %title, "Drafting section");
            let content = self.generate_section(topic, &title, identity).await?;
            sections.push(Section::new(title).with_content(content));
        }

        let job = ExportJob::new(topic, document_type, sections);
        let artifact = self.export(&job)?;
        info!(
            filename = %artifact.filename,
            sections = job.sections.len(),
            "Draft complete"
        );

        Ok(Draft {
            artifact,
            sections: job.sections,
        })
    }

    #[must_use]
    pub fn rate_limit_status(&self, identity: &str) -> RateLimitStatus {
        self.client.rate_limit_status(identity)
    }
}
