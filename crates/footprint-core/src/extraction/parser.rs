//! Vendor report parser: PDF bytes in, at most one footprint record out.

use chrono::{Local, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, error, info, warn};

use super::coercion::{
    classify, clean_text, error_ratio, parse_count, parse_decimal, parse_number, parse_percent,
};
use super::recovery::recover_phase_ratios;
use super::search::{search_all_patterns, FieldMap};
use super::vendor::VendorProfile;
use crate::error::{ParseError, Result};
use crate::models::config::ExtractionConfig;
use crate::models::record::{DeviceCarbonFootprint, Vendor};
use crate::ocr::TextLocator;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Parser for one vendor's product carbon footprint reports.
pub struct FootprintParser {
    profile: VendorProfile,
    pdf: Box<dyn PdfProcessor>,
    locator: Option<Box<dyn TextLocator>>,
    image_recovery: bool,
    max_pages: usize,
}

impl FootprintParser {
    /// Create a parser for `vendor` with the default PDF backend and no OCR.
    pub fn new(vendor: Vendor) -> Self {
        let profile = VendorProfile::for_vendor(vendor);
        Self {
            profile,
            pdf: Box::new(PdfExtractor),
            locator: None,
            image_recovery: profile.image_recovery,
            max_pages: 0,
        }
    }

    /// Create a parser with the extraction settings of a config file.
    pub fn from_config(vendor: Vendor, config: &ExtractionConfig) -> Self {
        Self::new(vendor)
            .with_image_recovery(config.image_recovery)
            .with_max_pages(config.max_pages)
    }

    /// Replace the PDF backend.
    pub fn with_pdf_processor(mut self, pdf: impl PdfProcessor + 'static) -> Self {
        self.pdf = Box::new(pdf);
        self
    }

    /// Set the OCR backend used by the chart-legend fallback.
    pub fn with_locator(mut self, locator: impl TextLocator + 'static) -> Self {
        self.locator = Some(Box::new(locator));
        self
    }

    /// Enable or disable the chart-legend fallback. It can only be enabled
    /// for vendors whose reports carry such a chart.
    pub fn with_image_recovery(mut self, enabled: bool) -> Self {
        self.image_recovery = enabled && self.profile.image_recovery;
        self
    }

    /// Limit the number of page images the fallback inspects (0 = no limit).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn vendor(&self) -> Vendor {
        self.profile.vendor
    }

    /// Parse one report.
    ///
    /// `Ok(None)` means no pattern matched the document at all; the caller
    /// should treat it as "nothing to import", not as an error.
    pub fn parse(&self, body: &[u8], filename: &str) -> Result<Option<DeviceCarbonFootprint>> {
        let text = self.pdf.extract_text(body)?;
        debug!("Extracted {} characters of text from {}", text.len(), filename);

        let Some(mut record) = self.parse_text(&text, filename)? else {
            return Ok(None);
        };

        if record.gwp_use_ratio.is_none() && self.image_recovery {
            self.recover_from_images(&mut record, body, filename);
        }

        info!("Parsed {} report {}: {}", self.profile.vendor, filename, record.name);
        Ok(Some(record))
    }

    /// Parse already extracted document text. Never touches page images.
    pub fn parse_text(
        &self,
        text: &str,
        filename: &str,
    ) -> std::result::Result<Option<DeviceCarbonFootprint>, ParseError> {
        let Some(fields) = search_all_patterns(self.profile.patterns, text) else {
            error!(filename, "Text did not match any {} report pattern", self.profile.vendor);
            return Ok(None);
        };
        debug!("Captured fields from {}: {:?}", filename, fields.names());

        build_record(&self.profile, &fields, text, Local::now().date_naive()).map(Some)
    }

    /// Fill the use and manufacturing ratios from the chart legend.
    ///
    /// Failures here never fail the parse: the record is kept as it is.
    fn recover_from_images(&self, record: &mut DeviceCarbonFootprint, body: &[u8], filename: &str) {
        let Some(locator) = self.locator.as_deref() else {
            debug!("No OCR engine configured, skipping image recovery for {}", filename);
            return;
        };

        let pages = match self.pdf.page_images(body) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Could not read page images of {}: {}", filename, e);
                return;
            }
        };
        let limit = if self.max_pages == 0 { usize::MAX } else { self.max_pages };

        match recover_phase_ratios(pages.take(limit), locator) {
            Ok(recovered) => {
                debug!("Recovered from images of {}: {:?}", filename, recovered);
                if let Some(ratio) = recovered.use_ratio {
                    record.gwp_use_ratio = Some(ratio);
                }
                if let Some(ratio) = recovered.manufacturing_ratio {
                    record.gwp_manufacturing_ratio = Some(ratio);
                }
            }
            Err(e) => warn!("Image recovery failed for {}: {}", filename, e),
        }
    }
}

/// Device name with the vendor prefix removed.
fn device_name(
    profile: &VendorProfile,
    fields: &FieldMap,
    text: &str,
) -> std::result::Result<String, ParseError> {
    let name = fields.get("name").map(str::trim).unwrap_or_default();
    let name = profile
        .name_prefix
        .and_then(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
        .trim();

    if name.is_empty() {
        return Err(ParseError::MissingField { field: "name", text: text.to_string() });
    }
    Ok(name.to_string())
}

/// Map raw captures onto a record.
fn build_record(
    profile: &VendorProfile,
    fields: &FieldMap,
    text: &str,
    added_date: NaiveDate,
) -> std::result::Result<DeviceCarbonFootprint, ParseError> {
    let name = device_name(profile, fields, text)?;
    let mut record = DeviceCarbonFootprint::new(name, profile.add_method, added_date);

    if let Some((category, subcategory)) = classify(&record.name, profile.categories) {
        record.category = Some(category.to_string());
        record.subcategory = Some(subcategory.to_string());
    }

    let number = |field: &'static str| -> std::result::Result<Option<f64>, ParseError> {
        fields.get(field).map(|raw| parse_number(field, raw)).transpose().map(Option::flatten)
    };
    let decimal = |field: &'static str| {
        fields.get(field).map(|raw| parse_decimal(field, raw)).transpose().map(Option::flatten)
    };
    let percent = |field: &'static str| {
        fields.get(field).map(|raw| parse_percent(field, raw)).transpose().map(Option::flatten)
    };
    let text_field = |field: &str| fields.get(field).and_then(clean_text);

    // A bare headline total overrides the one reported with a tolerance.
    if let (Some(total), Some(tolerance)) = (decimal("footprint_with_error")?, decimal("tolerance")?) {
        record.gwp_total = total.to_f64();
        record.gwp_error_ratio = error_ratio(tolerance, total);
    }
    if let Some(total) = decimal("footprint")? {
        record.gwp_total = total.to_f64();
        if let Some(deviation) = decimal("error")? {
            record.gwp_error_ratio = error_ratio(deviation, total);
        }
    }
    if profile.error_ratio_mandatory {
        if record.gwp_total.is_none() {
            return Err(ParseError::MissingField { field: "gwp_total", text: text.to_string() });
        }
        if record.gwp_error_ratio.is_none() {
            return Err(ParseError::MissingField { field: "gwp_error_ratio", text: text.to_string() });
        }
    }

    record.report_date = fields.get("date").map(str::to_string);
    record.weight = number("weight")?;
    record.screen_size = number("screen_size")?;
    record.lifetime = number("lifetime")?;
    record.yearly_tec = number("energy_demand")?;
    record.memory = number("ram")?;
    record.number_cpu = fields.get("cpu").map(|raw| parse_count("cpu", raw)).transpose()?.flatten();
    record.hard_drive = text_field("hdd");
    record.assembly_location = text_field("assembly_location");
    record.use_location = text_field("use_location");

    record.gwp_manufacturing_ratio = percent("gwp_manufacturing_ratio")?;
    record.gwp_use_ratio = percent("gwp_use_ratio")?;
    record.gwp_eol_ratio = percent("gwp_eol_ratio")?;
    record.gwp_transport_ratio = percent("gwp_transport_ratio")?;

    Ok(record)
}
