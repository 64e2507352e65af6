//! Record formatting shared by the parse and batch commands.

use footprint_core::DeviceCarbonFootprint;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub const CSV_HEADER: [&str; 21] = [
    "name",
    "category",
    "subcategory",
    "gwp_total",
    "gwp_error_ratio",
    "report_date",
    "weight",
    "screen_size",
    "assembly_location",
    "lifetime",
    "use_location",
    "yearly_tec",
    "hard_drive",
    "memory",
    "number_cpu",
    "gwp_manufacturing_ratio",
    "gwp_use_ratio",
    "gwp_eol_ratio",
    "gwp_transport_ratio",
    "added_date",
    "add_method",
];

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// One CSV row, in [`CSV_HEADER`] order.
pub fn csv_row(record: &DeviceCarbonFootprint) -> [String; 21] {
    [
        record.name.clone(),
        opt(&record.category),
        opt(&record.subcategory),
        opt(&record.gwp_total),
        opt(&record.gwp_error_ratio),
        opt(&record.report_date),
        opt(&record.weight),
        opt(&record.screen_size),
        opt(&record.assembly_location),
        opt(&record.lifetime),
        opt(&record.use_location),
        opt(&record.yearly_tec),
        opt(&record.hard_drive),
        opt(&record.memory),
        opt(&record.number_cpu),
        opt(&record.gwp_manufacturing_ratio),
        opt(&record.gwp_use_ratio),
        opt(&record.gwp_eol_ratio),
        opt(&record.gwp_transport_ratio),
        record.added_date.to_string(),
        record.add_method.clone(),
    ]
}

pub fn format_record(record: &DeviceCarbonFootprint, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &DeviceCarbonFootprint) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &DeviceCarbonFootprint) -> String {
    let mut output = String::new();

    output.push_str(&format!("Device: {}\n", record.name));
    if let (Some(category), Some(subcategory)) = (&record.category, &record.subcategory) {
        output.push_str(&format!("Category: {} / {}\n", category, subcategory));
    }
    if let Some(date) = &record.report_date {
        output.push_str(&format!("Report date: {}\n", date));
    }
    output.push('\n');

    output.push_str("Footprint:\n");
    match (record.gwp_total, record.gwp_error_ratio) {
        (Some(total), Some(ratio)) => {
            output.push_str(&format!("  Total: {} kgCO2e (+/- {:.1}%)\n", total, ratio * 100.0))
        }
        (Some(total), None) => output.push_str(&format!("  Total: {} kgCO2e\n", total)),
        _ => output.push_str("  Total: unknown\n"),
    }

    let phases = ["Manufacturing", "Use", "End of life", "Transport"];
    for (label, ratio) in phases.iter().zip(record.phase_ratios()) {
        if let Some(ratio) = ratio {
            output.push_str(&format!("  {:<14} {:.1}%\n", format!("{}:", label), ratio * 100.0));
        }
    }
    output.push('\n');

    output.push_str("Assumptions:\n");
    let assumptions = [
        ("Lifetime (years)", opt(&record.lifetime)),
        ("Use location", opt(&record.use_location)),
        ("Yearly TEC (kWh)", opt(&record.yearly_tec)),
        ("Weight (kg)", opt(&record.weight)),
        ("Screen size (in)", opt(&record.screen_size)),
        ("Assembly", opt(&record.assembly_location)),
    ];
    for (label, value) in assumptions.iter().filter(|(_, v)| !v.is_empty()) {
        output.push_str(&format!("  {}: {}\n", label, value));
    }

    output.push_str(&format!("\nAdded {} by {}\n", record.added_date, record.add_method));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DeviceCarbonFootprint {
        let date = "2024-05-02".parse().unwrap();
        let mut record = DeviceCarbonFootprint::new("Latitude 5420", "Dell Auto Parser", date);
        record.category = Some("Workplace".to_string());
        record.subcategory = Some("Laptop".to_string());
        record.gwp_total = Some(500.0);
        record.gwp_error_ratio = Some(0.1);
        record.gwp_use_ratio = Some(0.25);
        record
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_record(&record(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("name,category,subcategory,gwp_total"));
        assert!(lines[1].starts_with("Latitude 5420,Workplace,Laptop,500,0.1,"));
        assert!(lines[1].ends_with("2024-05-02,Dell Auto Parser"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_record(&record(), OutputFormat::Text).unwrap();

        assert!(text.contains("Device: Latitude 5420"));
        assert!(text.contains("Total: 500 kgCO2e (+/- 10.0%)"));
        assert!(text.contains("Use:"));
        assert!(text.contains("25.0%"));
        assert!(!text.contains("Manufacturing:"));
    }

    #[test]
    fn test_json_omits_missing_fields() {
        let json = format_record(&record(), OutputFormat::Json).unwrap();

        assert!(json.contains(r#""name":"Latitude 5420""#));
        assert!(!json.contains("weight"));
    }
}
