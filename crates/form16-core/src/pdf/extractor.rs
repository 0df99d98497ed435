//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF text extractor.
///
/// pdf-extract does the layout-aware decoding; lopdf's simpler content
/// stream decoder covers pages pdf-extract leaves empty.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    /// Maximum pages to decode (0 = unlimited).
    max_pages: usize,
    /// Joined text shorter than this is logged as a likely decode failure.
    min_text_length: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self::from_config(&PdfConfig::default())
    }

    /// Create an extractor from PDF settings.
    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: config.max_pages,
            min_text_length: config.min_text_length,
        }
    }

    /// Limit the number of pages decoded (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }

    /// Page numbers to decode, in document order.
    fn page_numbers(&self, doc: &Document) -> Vec<u32> {
        let limit = if self.max_pages == 0 { usize::MAX } else { self.max_pages };
        doc.get_pages().keys().copied().take(limit).collect()
    }

    fn fallback_page_text(&self, doc: &Document, page: u32) -> String {
        match doc.extract_text(&[page]) {
            Ok(text) => text,
            Err(e) => {
                trace!("lopdf could not decode page {}: {}", page, e);
                String::new()
            }
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads the bytes, so keep the decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page_texts(&self) -> Result<Vec<String>> {
        let doc = self.document()?;
        let pages = self.page_numbers(doc);

        let decoded = match pdf_extract::extract_text_from_mem_by_pages(&self.raw_data) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("pdf-extract failed, falling back to lopdf: {}", e);
                Vec::new()
            }
        };

        let texts: Vec<String> = pages
            .iter()
            .enumerate()
            .map(|(idx, &page)| match decoded.get(idx) {
                Some(text) if !text.trim().is_empty() => text.clone(),
                _ => self.fallback_page_text(doc, page),
            })
            .collect();

        let total: usize = texts.iter().map(|t| t.trim().len()).sum();
        if total < self.min_text_length {
            warn!(
                "Decoded only {} characters from {} pages; the PDF may be scanned",
                total,
                texts.len()
            );
        }
        debug!("Decoded {} pages, {} characters", texts.len(), total);

        Ok(texts)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        let index = doc
            .get_pages()
            .keys()
            .position(|&number| number == page)
            .ok_or(PdfError::InvalidPage(page))?;

        let decoded = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        Ok(match decoded.get(index) {
            Some(text) if !text.trim().is_empty() => text.clone(),
            _ => self.fallback_page_text(doc, page),
        })
    }
}
