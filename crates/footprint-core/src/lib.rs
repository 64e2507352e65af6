//! Core library for product carbon footprint report parsing.
//!
//! This crate provides:
//! - PDF processing (text and embedded image extraction)
//! - Per-vendor regex tables for Dell and HP reports
//! - A chart-legend OCR fallback for lifecycle phase ratios
//! - The device carbon footprint record model

pub mod error;
pub mod extraction;
pub mod models;
pub mod ocr;
pub mod pdf;

pub use error::{FootprintError, Result};
pub use extraction::{FootprintParser, VendorProfile};
pub use models::{DeviceCarbonFootprint, ExtractionConfig, FootprintConfig, OcrConfig, Vendor};
pub use ocr::{OcrResult, TextBlock, TextBox, TextLocator};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{PdfExtractor, PdfProcessor};
