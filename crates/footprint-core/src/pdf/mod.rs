//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Lazily produced page images, in page order.
pub type PageImages<'a> = Box<dyn Iterator<Item = DynamicImage> + 'a>;

/// Services the parsers need from a PDF backend.
///
/// Both methods take the raw document bytes, so a document can be read once
/// for text and a second time for images without the caller re-opening it.
pub trait PdfProcessor {
    /// Extract the plain text of the whole document.
    fn extract_text(&self, data: &[u8]) -> Result<String>;

    /// Iterate over the images embedded in the document, page by page.
    fn page_images<'a>(&'a self, data: &'a [u8]) -> Result<PageImages<'a>>;
}
