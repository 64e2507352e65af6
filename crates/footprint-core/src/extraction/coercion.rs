//! Conversion of raw captures into typed record values.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::patterns::CategoryTable;
use crate::error::ParseError;

type Result<T> = std::result::Result<T, ParseError>;

/// Remove every whitespace character; PDF text often breaks numbers across lines.
fn compact(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a captured number after removing all whitespace.
///
/// An empty capture is treated as absent.
pub fn parse_number(field: &'static str, raw: &str) -> Result<Option<f64>> {
    let value = compact(raw);
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ParseError::InvalidNumber { field, value: raw.to_string() })
}

/// Like [`parse_number`], keeping the exact decimal value.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<Option<Decimal>> {
    let value = compact(raw);
    if value.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&value)
        .map(Some)
        .map_err(|_| ParseError::InvalidNumber { field, value: raw.to_string() })
}

/// Parse a captured integer count.
pub fn parse_count(field: &'static str, raw: &str) -> Result<Option<u32>> {
    let value = compact(raw);
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ParseError::InvalidNumber { field, value: raw.to_string() })
}

/// Parse a percentage capture into a ratio in `[0, 1]` scale.
pub fn parse_percent(field: &'static str, raw: &str) -> Result<Option<f64>> {
    Ok(parse_number(field, raw)?.map(|percent| percent / 100.0))
}

/// Uncertainty as a fraction of the total, rounded to 4 places with ties
/// away from zero (0.05625 -> 0.0563).
///
/// `None` for a zero total.
pub fn error_ratio(margin: Decimal, total: Decimal) -> Option<f64> {
    if total.is_zero() {
        return None;
    }
    (margin / total)
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
}

/// Trimmed text, or `None` if nothing is left.
pub fn clean_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() { None } else { Some(value.to_string()) }
}

/// Look up `(category, subcategory)` for a device name.
///
/// Rules are tried in table order and the first keyword contained in `name`
/// wins.
pub fn classify(name: &str, table: &CategoryTable) -> Option<(&'static str, &'static str)> {
    table
        .iter()
        .find(|(keyword, _, _)| name.contains(keyword))
        .map(|&(_, category, subcategory)| (category, subcategory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::patterns::{DELL_CATEGORIES, HP_CATEGORIES};
    use pretty_assertions::assert_eq;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_whitespace_inside_numbers() {
        assert_eq!(parse_number("weight", "12 34").unwrap(), Some(1234.0));
        assert_eq!(parse_number("weight", "1.\n 38").unwrap(), Some(1.38));
        assert_eq!(parse_number("weight", " \n").unwrap(), None);
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_number("screen_size", "1,5").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { field: "screen_size", .. }));
        assert!(parse_count("cpu", "2.5").is_err());
    }

    #[test]
    fn test_percent_to_ratio() {
        assert_eq!(parse_percent("gwp_use_ratio", "45").unwrap(), Some(0.45));
        assert_eq!(parse_percent("gwp_use_ratio", "").unwrap(), None);
    }

    #[test]
    fn test_error_ratio_rounding() {
        assert_eq!(error_ratio(dec("50"), dec("500")), Some(0.1));
        assert_eq!(error_ratio(dec("95"), dec("320")), Some(0.2969));
        assert_eq!(error_ratio(dec("1"), dec("3")), Some(0.3333));
        assert_eq!(error_ratio(dec("5"), dec("0")), None);
    }

    #[test]
    fn test_error_ratio_ties_round_up() {
        assert_eq!(error_ratio(dec("45"), dec("800")), Some(0.0563));
        assert_eq!(error_ratio(dec("5"), dec("800")), Some(0.0063));
        assert_eq!(error_ratio(dec("1"), dec("16")), Some(0.0625));
    }

    #[test]
    fn test_first_matching_category_wins() {
        // Table order decides, not the position of the keyword in the name.
        assert_eq!(classify("XPS Monitor", DELL_CATEGORIES), Some(("Workplace", "Monitor")));
        assert_eq!(classify("HP EliteBook Display", HP_CATEGORIES), Some(("Workplace", "Monitor")));
        assert_eq!(classify("Poweredge R740", DELL_CATEGORIES), Some(("Datacenter", "Server")));
        assert_eq!(classify("HP EliteDesk 800 G6", HP_CATEGORIES), Some(("Workplace", "Desktop")));
        assert_eq!(classify("Inspiron 15", DELL_CATEGORIES), None);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(" China \n"), Some("China".to_string()));
        assert_eq!(clean_text("  "), None);
    }
}
