//! Error types for the hoadon-core library.

use thiserror::Error;

/// Main error type for the hoadon library.
#[derive(Error, Debug)]
pub enum HoadonError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// XML e-invoice processing error.
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to XML e-invoice processing.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("failed to parse XML: {0}")]
    Parse(String),

    /// Element text could not be decoded.
    #[error("malformed text content: {0}")]
    Text(String),
}

/// Result type for the hoadon library.
pub type Result<T> = std::result::Result<T, HoadonError>;
