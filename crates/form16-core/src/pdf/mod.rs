//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Text of every page in document order, one string per page. A page
    /// whose text cannot be decoded yields an empty string.
    fn page_texts(&self) -> Result<Vec<String>>;

    /// Page texts joined with newlines.
    fn extract_text(&self) -> Result<String> {
        Ok(self.page_texts()?.join("\n"))
    }

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
