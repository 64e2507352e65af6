//! OCR services used by the chart-legend fallback.

pub mod preprocessing;

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

pub use preprocessing::{binarize, crop, crop_rect};

use image::DynamicImage;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle as (min_x, min_y, max_x, max_y).
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes, in reading order.
    pub boxes: Vec<TextBox>,

    /// Full text (boxes joined with newlines).
    pub text: String,
}

impl OcrResult {
    /// Build a result from boxes, sorting them into reading order.
    pub fn from_boxes(mut boxes: Vec<TextBox>) -> Self {
        boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let text = boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self { boxes, text }
    }

    /// First box, in reading order, whose text matches `anchor`.
    pub fn find(&self, anchor: &Regex) -> Option<TextBlock> {
        self.boxes
            .iter()
            .find(|b| anchor.is_match(&b.text))
            .map(TextBlock::from)
    }
}

/// A located block of text inside an image, in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
    /// Text recognized inside the block.
    pub text: String,
}

impl From<&TextBox> for TextBlock {
    fn from(text_box: &TextBox) -> Self {
        let (min_x, min_y, max_x, max_y) = text_box.rect();
        let left = min_x.max(0.0).floor() as u32;
        let top = min_y.max(0.0).floor() as u32;

        Self {
            top,
            left,
            width: (max_x.max(0.0).ceil() as u32).saturating_sub(left),
            height: (max_y.max(0.0).ceil() as u32).saturating_sub(top),
            text: text_box.text.clone(),
        }
    }
}

/// Text location and recognition, as needed by the image fallback.
///
/// `threshold` is a binarization level (0-255) applied before recognition;
/// see [`binarize`].
pub trait TextLocator {
    /// Find the first block of text matching `anchor`.
    fn locate(
        &self,
        image: &DynamicImage,
        anchor: &Regex,
        threshold: u8,
    ) -> Result<Option<TextBlock>, OcrError>;

    /// Recognize all text in `image`.
    fn recognize(&self, image: &DynamicImage, threshold: u8) -> Result<String, OcrError>;
}

impl<T: TextLocator + ?Sized> TextLocator for &T {
    fn locate(
        &self,
        image: &DynamicImage,
        anchor: &Regex,
        threshold: u8,
    ) -> Result<Option<TextBlock>, OcrError> {
        (**self).locate(image, anchor, threshold)
    }

    fn recognize(&self, image: &DynamicImage, threshold: u8) -> Result<String, OcrError> {
        (**self).recognize(image, threshold)
    }
}
