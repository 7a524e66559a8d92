//! Outline extraction from generated text
//!
//! Providers are asked for a numbered list but answer however they like:
//! bullets, parenthesised numbers, a chatty preamble. Extraction is a cheap
//! line-by-line pass, not a parser:
//!
//! - blank lines are dropped
//! - a leading enumeration marker (`1.`, `2)`, `3:`, `4 `) or bullet (`* `, `- `)
//!   is stripped and the rest kept
//! - an unmarked line longer than 3 characters is kept whole
//! - anything else is discarded

use docforge_utils::error::ExtractionError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Enumeration marker or bullet, then the title
static MARKED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+[.):\s]+|[*-]\s+)(.+)$").expect("static regex"));

/// Unmarked lines must be longer than this (in characters) to count as a title
const MIN_UNMARKED_CHARS: usize = 3;

/// Title carried by one line, if any
fn title_from_line(line: &str) -> Option<&str> {
    if let Some(caps) = MARKED_LINE.captures(line)
        && let Some(rest) = caps.get(1)
    {
        let title = rest.as_str().trim();
        return (!title.is_empty()).then_some(title);
    }

    (line.chars().count() > MIN_UNMARKED_CHARS).then_some(line)
}

/// Extract ordered titles from `raw`.
///
/// # Errors
///
/// Returns `ExtractionError::EmptyOutline` when no line yields a title.
///
/// # Examples
///
/// ```
/// use docforge_extraction::extract_outline;
///
/// let titles = extract_outline("1. Intro\n2. Body\n3. End").unwrap();
/// assert_eq!(titles, vec!["Intro", "Body", "End"]);
/// ```
pub fn extract_outline(raw: &str) -> Result<Vec<String>, ExtractionError> {
    let titles: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(title_from_line)
        .map(str::to_string)
        .collect();

    debug!(count = titles.len(), "Extracted outline titles");

    if titles.is_empty() {
        return Err(ExtractionError::EmptyOutline);
    }
    Ok(titles)
}

/// Extract titles and warn when the count differs from `expected`.
///
/// A mismatch is advisory only; whatever was found is returned.
///
/// # Errors
///
/// Returns `ExtractionError::EmptyOutline` when no line yields a title.
pub fn extract_outline_expecting(
    raw: &str,
    expected: usize,
) -> Result<Vec<String>, ExtractionError> {
    let titles = extract_outline(raw)?;
    if titles.len() != expected {
        warn!(
            expected,
            actual = titles.len(),
            "Outline item count differs from expected; continuing"
        );
    }
    Ok(titles)
}
