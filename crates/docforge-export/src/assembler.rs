//! The seam between the dispatcher and the container formats

use chrono::{Local, NaiveDate};
use docforge_utils::error::ExportError;
use docforge_utils::types::{DocumentType, Section};

/// Turns a topic and ordered sections into one binary container.
///
/// Implementations are pure over their inputs (apart from the embedded
/// generation date) and produce the whole package or nothing.
pub trait Assembler: Send + Sync {
    /// Container this assembler produces
    fn document_type(&self) -> DocumentType;

    /// Build the package bytes.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::AssemblyFailure` when the package writer fails.
    fn assemble(&self, topic: &str, sections: &[Section]) -> Result<Vec<u8>, ExportError>;
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `March 5, 2024`
pub(crate) fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub(crate) fn generated_on_line(date: NaiveDate) -> String {
    format!("Generated on {}", display_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        assert_eq!(display_date(date), "November 30, 2025");
        assert_eq!(generated_on_line(date), "Generated on November 30, 2025");
    }
}
