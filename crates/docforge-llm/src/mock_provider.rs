//! Offline provider with canned responses
//!
//! The response is picked by looking for trigger words in the prompt, first
//! match wins:
//!
//! | Prompt contains | Response |
//! |-----------------|----------|
//! | `slide` | 8 numbered presentation slide titles |
//! | `document` or `section titles` | 5 numbered document section titles |
//! | `refine` | a refined paragraph |
//! | `section` | a generic section paragraph |
//! | anything else | echo of the first 50 characters of the prompt |

use async_trait::async_trait;
use docforge_utils::error::LlmError;
use tracing::debug;

use crate::types::{GenerationProvider, GenerationRequest};

pub(crate) const PRESENTATION_OUTLINE: &str = "1. Title Slide\n2. Executive Overview\n3. Market Analysis\n4. Problem Statement\n5. Proposed Solution\n6. Implementation Plan\n7. Expected Results\n8. Questions & Discussion";

pub(crate) const DOCUMENT_OUTLINE: &str = "1. Introduction & Executive Summary\n2. Market Analysis & Trends\n3. Product Overview & Features\n4. Implementation Strategy & Timeline\n5. Conclusion & Next Steps";

pub(crate) const REFINED_CONTENT: &str = "This refined version improves upon the original while maintaining the core message, now featuring enhanced clarity, professional language, and better organization.";

pub(crate) const SECTION_CONTENT: &str = "This is a comprehensive section covering all relevant aspects of the topic with professional detail, clear structure, and actionable insights suitable for business documentation.";

/// Characters of the prompt echoed back by the fallback response
const ECHO_PREFIX_CHARS: usize = 50;

/// Which canned response a prompt maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockScenario {
    PresentationOutline,
    DocumentOutline,
    Refinement,
    Section,
    Echo,
}

impl MockScenario {
    /// Classify a prompt by its trigger words (case-sensitive).
    #[must_use]
    pub fn for_prompt(prompt: &str) -> Self {
        if prompt.contains("slide") {
            Self::PresentationOutline
        } else if prompt.contains("document") || prompt.contains("section titles") {
            Self::DocumentOutline
        } else if prompt.contains("refine") {
            Self::Refinement
        } else if prompt.contains("section") {
            Self::Section
        } else {
            Self::Echo
        }
    }
}

/// Deterministic provider for offline use and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }

    /// The canned text for `prompt`
    #[must_use]
    pub fn respond(prompt: &str) -> String {
        match MockScenario::for_prompt(prompt) {
            MockScenario::PresentationOutline => PRESENTATION_OUTLINE.to_string(),
            MockScenario::DocumentOutline => DOCUMENT_OUTLINE.to_string(),
            MockScenario::Refinement => REFINED_CONTENT.to_string(),
            MockScenario::Section => SECTION_CONTENT.to_string(),
            MockScenario::Echo => {
                let prefix: String = prompt.chars().take(ECHO_PREFIX_CHARS).collect();
                format!("Mock response generated for prompt about: {prefix}...")
            }
        }
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_mock(&self) -> bool {
        true
    }

    async fn call_once(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let scenario = MockScenario::for_prompt(&request.prompt);
        debug!(?scenario, "Serving mock response");
        Ok(Self::respond(&request.prompt))
    }
}
