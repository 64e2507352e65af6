//! Image preprocessing for anchor search and region recognition.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};

/// Binarize an image: pixels brighter than `threshold` become white, the rest black.
///
/// Low thresholds keep only the darkest strokes, which isolates bold chart
/// labels from the coloured bars behind them.
pub fn binarize(image: &DynamicImage, threshold: u8) -> DynamicImage {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    let mut result = GrayImage::new(width, height);

    for (x, y, pixel) in gray.enumerate_pixels() {
        let output = if pixel[0] > threshold { 255 } else { 0 };
        result.put_pixel(x, y, Luma([output]));
    }

    DynamicImage::ImageLuma8(result)
}

/// Trim fractions of the width from the left and right sides of an image.
///
/// `crop(img, Some(0.25), Some(0.3))` keeps the band from 25% to 70% of the width.
pub fn crop(image: &DynamicImage, left: Option<f32>, right: Option<f32>) -> DynamicImage {
    let (width, height) = image.dimensions();
    let fraction_px = |f: f32| ((width as f32 * f.clamp(0.0, 1.0)) as u32).min(width);

    let start = left.map(fraction_px).unwrap_or(0);
    let end = width.saturating_sub(right.map(fraction_px).unwrap_or(0)).max(start);

    image.crop_imm(start, 0, end - start, height)
}

/// Crop the rectangle `[x0, x1) x [y0, y1)`, clamped to the image bounds.
///
/// Returns `None` when the clamped rectangle is empty.
pub fn crop_rect(image: &DynamicImage, x0: u32, y0: u32, x1: u32, y1: u32) -> Option<DynamicImage> {
    let (width, height) = image.dimensions();
    let x1 = x1.min(width);
    let y1 = y1.min(height);

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some(image.crop_imm(x0, y0, x1 - x0, y1 - y0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    #[test]
    fn test_crop_fractions() {
        let img = blank(200, 50);

        assert_eq!(crop(&img, None, Some(0.25)).dimensions(), (150, 50));
        assert_eq!(crop(&img, Some(0.25), Some(0.3)).dimensions(), (90, 50));
        assert_eq!(crop(&img, None, None).dimensions(), (200, 50));
        assert_eq!(crop(&img, Some(0.8), Some(0.5)).dimensions(), (0, 50));
    }

    #[test]
    fn test_crop_rect_clamps() {
        let img = blank(100, 40);

        let region = crop_rect(&img, 90, 30, 140, 80).unwrap();
        assert_eq!(region.dimensions(), (10, 10));
        assert!(crop_rect(&img, 100, 0, 120, 10).is_none());
    }

    #[test]
    fn test_binarize() {
        let mut gray = GrayImage::new(3, 1);
        gray.put_pixel(0, 0, Luma([20]));
        gray.put_pixel(1, 0, Luma([150]));
        gray.put_pixel(2, 0, Luma([151]));

        let out = binarize(&DynamicImage::ImageLuma8(gray), 150).to_luma8();
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 0);
        assert_eq!(out.get_pixel(2, 0)[0], 255);
    }
}
