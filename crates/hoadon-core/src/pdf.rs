//! PDF text extraction using lopdf and pdf-extract.

use std::fs;
use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::{PdfError, Result};

/// Source of plain document text for classification.
///
/// Implementations concatenate the text of all pages in document order;
/// pages without extractable text contribute nothing. Unreadable inputs
/// surface as errors, never as empty text.
pub trait TextSource {
    /// Extract the full text of the document at `path`.
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Text source backed by lopdf and pdf-extract.
///
/// Encrypted documents are decrypted with an empty password first, the
/// usual protection on issued e-invoice PDFs.
#[derive(Debug, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for PdfTextSource {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let data = fs::read(path)?;
        let mut doc = Document::load_mem(&data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // pdf_extract cannot read encrypted bytes, so feed it the
        // re-saved decrypted document instead
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted.into());
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages.into());
        }
        debug!("loaded PDF with {} pages", page_count);

        let text = pdf_extract::extract_text_from_mem(&raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(text)
    }
}
