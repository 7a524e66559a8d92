//! Turning free-form generated text into an ordered outline

mod outline;

pub use docforge_utils::error::ExtractionError;
pub use outline::{extract_outline, extract_outline_expecting};
