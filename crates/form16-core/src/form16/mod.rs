//! Form 16 field extraction module.

pub mod layout;
mod parser;
pub mod rules;

pub use layout::{detect, detect_layout, Detection, DetectionCue, DocumentLayout};
pub use parser::{AmountField, ExtractionResult, Form16Parser};

use crate::models::record::Form16Record;

/// Trait for Form 16 field extractors.
pub trait Form16Extractor {
    /// Extract a record from document text.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;

    /// Extract a record from per-page text, pages joined in order.
    fn extract_from_pages(&self, pages: &[String]) -> ExtractionResult {
        self.extract_from_text(&pages.join("\n"))
    }
}

/// Extract a record from document text with layout detection.
///
/// Always returns a record; a record with every field at its default means
/// nothing could be located.
pub fn extract(text: &str) -> Form16Record {
    Form16Parser::new().parse(text).record
}
