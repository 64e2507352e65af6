//! Error types for the footprint-core library.

use thiserror::Error;

/// Main error type for the footprint library.
#[derive(Error, Debug)]
pub enum FootprintError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
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

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised while turning extracted text into a record.
///
/// These are hard failures: they point at a gap in a vendor pattern table
/// and carry enough context to reproduce it.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A mandatory field was not captured. `text` is the full extracted text.
    #[error("missing mandatory field `{field}` in extracted text:\n{text}")]
    MissingField { field: &'static str, text: String },

    /// A numeric capture could not be parsed, even with whitespace removed.
    #[error("failed to parse {field} as a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Result type for the footprint library.
pub type Result<T> = std::result::Result<T, FootprintError>;
