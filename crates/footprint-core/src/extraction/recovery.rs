//! Chart-legend fallback: read phase percentages off page images.
//!
//! Some reports only give the lifecycle split as a pie chart whose legend is
//! an image. Each label is located on a binarized copy of the page, a small
//! region around it is re-read, and the percentage is parsed out of the text.

use image::DynamicImage;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::coercion::parse_percent;
use super::patterns::{MANUFACTURING_ANCHOR, MANUFACTURING_PERCENT, USE_ANCHOR, USE_PERCENT};
use crate::error::OcrError;
use crate::ocr::{crop, crop_rect, TextBlock, TextLocator};

/// Pixels kept above a located label.
const MARGIN_TOP: u32 = 3;
/// The re-read region is this many label heights tall.
const HEIGHT_FACTOR: u32 = 3;

/// Where and how to look for one legend label.
struct LabelProbe {
    field: &'static str,
    anchor: &'static Regex,
    value: &'static Regex,
    trim_left: Option<f32>,
    trim_right: Option<f32>,
    locate_threshold: u8,
    read_threshold: u8,
    margin_left: u32,
    margin_right: u32,
}

lazy_static! {
    static ref USE_PROBE: LabelProbe = LabelProbe {
        field: "gwp_use_ratio",
        anchor: &USE_ANCHOR,
        value: &USE_PERCENT,
        trim_left: None,
        trim_right: Some(0.25),
        locate_threshold: 150,
        read_threshold: 130,
        margin_left: 20,
        margin_right: 20,
    };

    static ref MANUFACTURING_PROBE: LabelProbe = LabelProbe {
        field: "gwp_manufacturing_ratio",
        anchor: &MANUFACTURING_ANCHOR,
        value: &MANUFACTURING_PERCENT,
        trim_left: Some(0.25),
        trim_right: Some(0.3),
        locate_threshold: 50,
        read_threshold: 30,
        margin_left: 8,
        margin_right: 3,
    };
}

/// Outcome of probing one label on one image.
#[derive(Debug, Default)]
struct ProbeOutcome {
    located: bool,
    ratio: Option<f64>,
}

impl LabelProbe {
    fn run<L: TextLocator + ?Sized>(
        &self,
        image: &DynamicImage,
        locator: &L,
    ) -> Result<ProbeOutcome, OcrError> {
        let search_area = crop(image, self.trim_left, self.trim_right);

        let Some(block) = locator.locate(&search_area, self.anchor, self.locate_threshold)? else {
            return Ok(ProbeOutcome::default());
        };
        trace!("{} label at {:?}", self.field, block);

        let Some(region) = self.region(&search_area, &block) else {
            return Ok(ProbeOutcome { located: true, ratio: None });
        };

        let text: String = locator
            .recognize(&region, self.read_threshold)?
            .chars()
            .filter(|c| *c != '\n' && *c != ' ')
            .collect();

        let ratio = self
            .value
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_percent(self.field, m.as_str()).ok().flatten());
        debug!("{} read back as {:?} -> {:?}", self.field, text, ratio);

        Ok(ProbeOutcome { located: true, ratio })
    }

    /// The label plus its value to the right, clamped to the image.
    fn region(&self, image: &DynamicImage, block: &TextBlock) -> Option<DynamicImage> {
        crop_rect(
            image,
            block.left.saturating_sub(self.margin_left),
            block.top.saturating_sub(MARGIN_TOP),
            block.left + block.width + self.margin_right,
            block.top + block.height * HEIGHT_FACTOR,
        )
    }
}

/// Phase ratios read back from page images.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecoveredRatios {
    pub use_ratio: Option<f64>,
    pub manufacturing_ratio: Option<f64>,
}

/// Probe page images in order for the use and manufacturing legend labels.
///
/// Scanning stops after the first image on which either label was located,
/// whether or not a value could be read there.
pub fn recover_phase_ratios<I, L>(pages: I, locator: &L) -> Result<RecoveredRatios, OcrError>
where
    I: IntoIterator<Item = DynamicImage>,
    L: TextLocator + ?Sized,
{
    let mut recovered = RecoveredRatios::default();

    for (index, page) in pages.into_iter().enumerate() {
        let use_probe = USE_PROBE.run(&page, locator)?;
        let manufacturing_probe = MANUFACTURING_PROBE.run(&page, locator)?;

        recovered.use_ratio = use_probe.ratio;
        recovered.manufacturing_ratio = manufacturing_probe.ratio;

        if use_probe.located || manufacturing_probe.located {
            debug!("Chart legend found on image {}", index + 1);
            break;
        }
    }

    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};
    use std::cell::RefCell;

    /// Locator that answers from fixed tables and records the calls it saw.
    #[derive(Default)]
    struct ScriptedLocator {
        /// (anchor, page width after trimming, block)
        blocks: Vec<(&'static str, u32, TextBlock)>,
        /// (read threshold, text)
        readings: Vec<(u8, &'static str)>,
        calls: RefCell<Vec<String>>,
    }

    impl TextLocator for ScriptedLocator {
        fn locate(
            &self,
            image: &DynamicImage,
            anchor: &Regex,
            threshold: u8,
        ) -> Result<Option<TextBlock>, OcrError> {
            self.calls
                .borrow_mut()
                .push(format!("locate {} {} w={}", anchor.as_str(), threshold, image.width()));
            Ok(self
                .blocks
                .iter()
                .find(|(a, width, _)| *a == anchor.as_str() && *width == image.width())
                .map(|(_, _, block)| block.clone()))
        }

        fn recognize(&self, image: &DynamicImage, threshold: u8) -> Result<String, OcrError> {
            let (w, h) = image.dimensions();
            self.calls.borrow_mut().push(format!("read {} {}x{}", threshold, w, h));
            Ok(self
                .readings
                .iter()
                .find(|(t, _)| *t == threshold)
                .map(|(_, text)| text.to_string())
                .unwrap_or_default())
        }
    }

    fn page(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    fn block(left: u32, top: u32, width: u32, height: u32, text: &str) -> TextBlock {
        TextBlock { top, left, width, height, text: text.to_string() }
    }

    #[test]
    fn test_use_ratio_from_legend() {
        let locator = ScriptedLocator {
            blocks: vec![("Use", 300, block(100, 50, 30, 10, "Use"))],
            readings: vec![(130, "Use\n45 %")],
            ..Default::default()
        };

        let recovered = recover_phase_ratios(vec![page(400, 200)], &locator).unwrap();
        assert_eq!(recovered, RecoveredRatios { use_ratio: Some(0.45), manufacturing_ratio: None });

        let calls = locator.calls.borrow();
        // 400px page: use search keeps 300px, manufacturing search keeps 180px.
        assert_eq!(calls[0], "locate Use 150 w=300");
        // x 80..150, y 47..80
        assert_eq!(calls[1], "read 130 70x33");
        assert_eq!(calls[2], "locate Manufa 50 w=180");
    }

    #[test]
    fn test_manufacturing_ratio_from_legend() {
        let locator = ScriptedLocator {
            blocks: vec![("Manufa", 180, block(4, 2, 60, 12, "Manufacturing"))],
            readings: vec![(30, "Manufacuring 81.5%")],
            ..Default::default()
        };

        let recovered = recover_phase_ratios(vec![page(400, 200)], &locator).unwrap();
        assert_eq!(recovered.manufacturing_ratio, Some(0.815));
        assert_eq!(recovered.use_ratio, None);

        // Clamped at the left and top edges: x 0..67, y 0..38.
        assert!(locator.calls.borrow().contains(&"read 30 67x38".to_string()));
    }

    #[test]
    fn test_stops_after_first_page_with_a_label() {
        let locator = ScriptedLocator {
            // Only the 300px-wide second page (after trimming) has the label.
            blocks: vec![("Use", 300, block(10, 10, 20, 10, "Use"))],
            readings: vec![(130, "no digits here")],
            ..Default::default()
        };

        let pages = vec![page(100, 100), page(400, 100), page(400, 100)];
        let recovered = recover_phase_ratios(pages, &locator).unwrap();

        assert_eq!(recovered, RecoveredRatios::default());
        let locates = locator
            .calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("locate"))
            .count();
        assert_eq!(locates, 4);
    }

    #[test]
    fn test_no_labels_anywhere() {
        let locator = ScriptedLocator::default();
        let recovered = recover_phase_ratios(vec![page(50, 50), page(50, 50)], &locator).unwrap();

        assert_eq!(recovered, RecoveredRatios::default());
        assert_eq!(locator.calls.borrow().len(), 4);
    }

    #[test]
    fn test_locator_error_propagates() {
        struct Failing;

        impl TextLocator for Failing {
            fn locate(&self, _: &DynamicImage, _: &Regex, _: u8) -> Result<Option<TextBlock>, OcrError> {
                Err(OcrError::Recognition("model crashed".to_string()))
            }

            fn recognize(&self, _: &DynamicImage, _: u8) -> Result<String, OcrError> {
                unreachable!()
            }
        }

        assert!(recover_phase_ratios(vec![page(10, 10)], &Failing).is_err());
    }
}
