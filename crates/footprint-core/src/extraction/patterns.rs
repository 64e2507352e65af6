//! Regex tables for Dell and HP product carbon footprint reports.
//!
//! Every rule of a table is run against the whole document text and the
//! named captures are merged in table order, so when two rules capture the
//! same field the later one wins.

use lazy_static::lazy_static;
use regex::Regex;

/// Ordered `(keyword, category, subcategory)` rules. The first keyword found
/// in the device name wins.
pub type CategoryTable = [(&'static str, &'static str, &'static str)];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

lazy_static! {
    pub static ref DELL_PATTERNS: Vec<Regex> = compile(&[
        r" (?P<name>.*?)\s*From design to end-of-life",
        r" estimated carbon footprint: \s*(?P<footprint>[0-9]*) kgCO2e(?: \+/- (?P<error>[0-9]*) kgCO2e)?",
        r" estimated standard deviation of \+/- (?P<error>[0-9]*)\s*kgCO2e",
        r" Report produced\s*(?P<date>[A-Z][a-z]*,* [0-9]{4}) ",
        r" Product Weight\s*(?P<weight>[0-9]*.[0-9]*)\s*kg",
        r" Screen Size\s*(?P<screen_size>[0-9]*)",
        r"Assembly Location\s*(?P<assembly_location>[A-Za-z]*)\s+",
        r"Product Lifetime\s*(?P<lifetime>[0-9]*) years",
        r" Use Location\s*(?P<use_location>[A-Za-z]*)\s+",
        r" Energy Demand \(Yearly TEC\)\s*(?P<energy_demand>[0-9]*.[0-9]*)\s*kWh",
        r" HDD/SSD Quantity (?P<hdd>.*(?:SSD|HDD?))\s+",
        r" DRAM Capacity\s*(?P<ram>[0-9]*)[A-Z]{2}\s+",
        r" CPU Quantity\s*(?P<cpu>[0-9]*)\s+",
        r"Use\s*(?P<gwp_use_ratio>[0-9]*\.*[0-9]*)%",
        r"Manufacturing\s*(?P<gwp_manufacturing_ratio>[0-9]*\.*[0-9]*)%",
        r"EoL\s*(?P<gwp_eol_ratio>[0-9]*\.*[0-9]*)%",
        r"Transportation\s*(?P<gwp_transport_ratio>[0-9]*\.*[0-9]*)%",
    ]);

    pub static ref HP_PATTERNS: Vec<Regex> = compile(&[
        r"Product carbon footprint (?P<name>.*?)\s*Estimated impact",
        r"Product (c|C)arbon (f|F)ootprint (Report)*\s*(?P<name>.{0,50}?)\s*GHG",
        r" Estimated impact (?P<footprint>[0-9]*)\s*kgCO2 eq.",
        r"herein.(?P<footprint>[0-9]*)\s*kg\s*CO2eq.",
        r" Other organizations might report this value as (?P<footprint_with_error>[0-9]*) \+/- (?P<tolerance>[0-9]*) kg of CO2-e",
        r" Lifetime of product\s*(?P<lifetime>[0-9]*) years",
        r" Use location\s*(?P<use_location>[A-Za-z]*)\s+",
        r"Use energy demand \(Yearly TEC\)\s*(?P<energy_demand>[0-9]*.[0-9]*)\s*kWh",
        r" Product weight\s*(?P<weight>[0-9]*.\s*[0-9]*)\s*kg",
        r" Screen size\s*(?P<screen_size>[0-9]*.\s*[0-9]*)\s*inches",
        r" Final manufacturing location\s*(?P<assembly_location>[A-Za-z]*)\s+",
        r" Copyright \s*(?P<date>[0-9]{4}) ",
        r"Use\s*(?P<gwp_use_ratio>[0-9]*\.*[0-9]*)%",
        r"Manufac(?:turing|uring|ture)\s*(?P<gwp_manufacturing_ratio>[0-9]*\.*[0-9]*)%",
        r"End (O|o)f Life\s*(?P<gwp_eol_ratio>[0-9]*\.*[0-9]*)%",
        r"Distribution\s*(?P<gwp_transport_ratio>[0-9]*\.*[0-9]*)%",
        // The assumptions table flattens into one run of values; keep it last
        // so it overrides the per-label captures above.
        r#"Assumptions\s(?P<lifetime>[0-9]*)(?P<use_location>[A-Z a-z]*)(?P<energy_demand>[0-9]*.\s*[0-9]{2})(?P<weight>[0-9]*.\s*[0-9]*)(?P<screen_size>[0-9]{2}\.*[0-9]*)"*(?P<assembly_location>[A-Z a-z]*)Learn"#,
    ]);

    // Chart legend anchors and values, read back from page images.
    pub static ref USE_ANCHOR: Regex = Regex::new("Use").unwrap();
    pub static ref MANUFACTURING_ANCHOR: Regex = Regex::new("Manufa").unwrap();
    pub static ref USE_PERCENT: Regex = Regex::new(r"^.*Use([0-9]*\.*[0-9]*)%").unwrap();
    pub static ref MANUFACTURING_PERCENT: Regex =
        Regex::new(r"^.*Manufac(?:turing|uring|ture)([0-9]*\.*[0-9]*)%").unwrap();
}

pub static DELL_CATEGORIES: &CategoryTable = &[
    ("Monitor", "Workplace", "Monitor"),
    ("Poweredge", "Datacenter", "Server"),
    ("Latitude", "Workplace", "Laptop"),
    ("OptiPlex", "Workplace", "Desktop"),
    ("Precision", "Workplace", "Desktop"),
    ("Wyse", "Workplace", "Thin client"),
    ("XPS", "Workplace", "Laptop"),
];

pub static HP_CATEGORIES: &CategoryTable = &[
    ("Monitor", "Workplace", "Monitor"),
    ("Display", "Workplace", "Monitor"),
    ("ZBook", "Workplace", "Laptop"),
    ("EliteBook", "Workplace", "Laptop"),
    ("ProBook", "Workplace", "Laptop"),
    ("Chromebook", "Workplace", "Laptop"),
    ("Notebook", "Workplace", "Laptop"),
    ("EliteDesk", "Workplace", "Desktop"),
    ("ProDesk", "Workplace", "Desktop"),
    ("EliteOne", "Workplace", "Desktop"),
    ("All-in-One", "Workplace", "Desktop"),
    ("Workstation", "Workplace", "Desktop"),
    ("Thin Client", "Workplace", "Thin client"),
];
