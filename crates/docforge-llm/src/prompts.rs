//! Prompt builders for the three generation tasks
//!
//! Each builder returns a complete [`GenerationRequest`] with the token ceiling
//! and temperature that task uses. The wording also decides which canned
//! response the mock provider serves, so the section and refine prompts avoid
//! the outline trigger words.

use docforge_utils::types::DocumentType;

use crate::types::GenerationRequest;

const OUTLINE_MAX_TOKENS: u32 = 300;
const OUTLINE_TEMPERATURE: f32 = 0.2;

const SECTION_MAX_TOKENS: u32 = 1000;
const SECTION_TEMPERATURE: f32 = 0.7;

const REFINE_MAX_TOKENS: u32 = 2000;

/// Ask for a numbered outline: 5 section titles for a document, 8 slide titles for a presentation.
#[must_use]
pub fn outline_prompt(topic: &str, document_type: DocumentType) -> GenerationRequest {
    let prompt = match document_type {
        DocumentType::Document => format!(
            "Generate 5 section titles for a professional business document about: \"{topic}\"\n\
             Return ONLY these 5 titles as a numbered list, one per line. \
             Do not include any other text, introduction, or explanation.\n\
             Format example:\n\
             1. Introduction and Overview\n\
             2. Current Market Situation\n\
             3. Our Solution\n\
             4. Implementation Roadmap\n\
             5. Expected Outcomes and Conclusion"
        ),
        DocumentType::Presentation => format!(
            "Generate 8 slide titles for a professional presentation about: \"{topic}\"\n\
             Return ONLY these 8 titles as a numbered list, one per line. \
             Do not include any other text, introduction, or explanation.\n\
             Format example:\n\
             1. Title Slide\n\
             2. Overview and Agenda\n\
             3. Current Market Analysis\n\
             4. Problem Definition\n\
             5. Our Solution\n\
             6. Implementation Timeline\n\
             7. Results and Benefits\n\
             8. Questions and Discussion"
        ),
    };

    GenerationRequest::new(prompt)
        .with_max_output_tokens(OUTLINE_MAX_TOKENS)
        .with_temperature(OUTLINE_TEMPERATURE)
}

/// Ask for the body of one section, 150-300 words of plain text.
#[must_use]
pub fn section_prompt(topic: &str, section_title: &str) -> GenerationRequest {
    let prompt = format!(
        "Write a comprehensive, professional section for a business report about \"{topic}\" \
         with the section title \"{section_title}\".\n\
         Requirements:\n\
         - Write between 150-300 words\n\
         - Use clear, professional language\n\
         - Organize with logical paragraphs\n\
         - Focus on practical insights and actionable information\n\
         - No markdown formatting, just plain text\n\
         Content:"
    );

    GenerationRequest::new(prompt)
        .with_max_output_tokens(SECTION_MAX_TOKENS)
        .with_temperature(SECTION_TEMPERATURE)
}

/// Ask to rework `current_content` according to `instruction`.
#[must_use]
pub fn refine_prompt(current_content: &str, instruction: &str) -> GenerationRequest {
    let prompt = format!(
        "Here is current content:\n\n{current_content}\n\n\
         User request: {instruction}\n\n\
         Please refine the content based on the user's request while maintaining professional quality."
    );

    GenerationRequest::new(prompt).with_max_output_tokens(REFINE_MAX_TOKENS)
}
