//! Data models and configuration.

pub mod config;
pub mod record;

pub use config::{ExtractionConfig, FootprintConfig, OcrConfig};
pub use record::{DeviceCarbonFootprint, Vendor};
