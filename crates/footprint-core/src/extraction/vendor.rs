//! Per-vendor parser settings.

use regex::Regex;

use super::patterns::{CategoryTable, DELL_CATEGORIES, DELL_PATTERNS, HP_CATEGORIES, HP_PATTERNS};
use crate::models::record::Vendor;

/// Everything that differs between two vendor document families.
#[derive(Debug, Clone, Copy)]
pub struct VendorProfile {
    pub vendor: Vendor,
    /// Pattern table, applied in order.
    pub patterns: &'static [Regex],
    /// Brand token stripped from the front of the device name.
    pub name_prefix: Option<&'static str>,
    /// Keyword priority list for category/subcategory.
    pub categories: &'static CategoryTable,
    /// Abort the parse when no footprint/uncertainty pair was captured.
    pub error_ratio_mandatory: bool,
    /// Try the chart-legend image fallback when the use ratio is missing.
    pub image_recovery: bool,
    /// Provenance stamped on every record.
    pub add_method: &'static str,
}

impl VendorProfile {
    /// Settings for `vendor`.
    pub fn for_vendor(vendor: Vendor) -> Self {
        match vendor {
            Vendor::Dell => Self {
                vendor,
                patterns: DELL_PATTERNS.as_slice(),
                name_prefix: Some("Dell "),
                categories: DELL_CATEGORIES,
                error_ratio_mandatory: true,
                image_recovery: false,
                add_method: "Dell Auto Parser",
            },
            Vendor::Hp => Self {
                vendor,
                patterns: HP_PATTERNS.as_slice(),
                name_prefix: None,
                categories: HP_CATEGORIES,
                error_ratio_mandatory: false,
                image_recovery: true,
                add_method: "HP Auto Parser",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_ratio_policy_differs_by_vendor() {
        assert!(VendorProfile::for_vendor(Vendor::Dell).error_ratio_mandatory);
        assert!(!VendorProfile::for_vendor(Vendor::Hp).error_ratio_mandatory);
    }

    #[test]
    fn test_chart_fallback_only_for_hp() {
        assert!(!VendorProfile::for_vendor(Vendor::Dell).image_recovery);
        assert!(VendorProfile::for_vendor(Vendor::Hp).image_recovery);
    }

    #[test]
    fn test_add_method() {
        assert_eq!(VendorProfile::for_vendor(Vendor::Dell).add_method, "Dell Auto Parser");
        assert_eq!(VendorProfile::for_vendor(Vendor::Hp).add_method, "HP Auto Parser");
    }
}
