//! Device carbon footprint record produced by the vendor parsers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Vendor document family a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Dell product carbon footprint reports.
    Dell,
    /// HP product carbon footprint reports.
    Hp,
}

impl Vendor {
    /// All supported vendors.
    pub const ALL: [Vendor; 2] = [Vendor::Dell, Vendor::Hp];

    /// Human readable vendor name, as used in log lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Dell => "Dell",
            Vendor::Hp => "HP",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dell" => Ok(Vendor::Dell),
            "hp" => Ok(Vendor::Hp),
            other => Err(format!("unknown vendor: {}", other)),
        }
    }
}

/// Carbon footprint metadata of one device, extracted from one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCarbonFootprint {
    /// Device name, without the vendor brand prefix.
    pub name: String,

    /// Broad category (e.g. "Workplace", "Datacenter").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Device type within the category (e.g. "Laptop").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Total global warming potential in kg CO2e.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_total: Option<f64>,

    /// Reported uncertainty as a fraction of `gwp_total`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_error_ratio: Option<f64>,

    /// Report date as printed in the document ("March, 2021", "2020").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,

    /// Product weight in kg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Screen size in inches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_size: Option<f64>,

    /// Final assembly region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly_location: Option<String>,

    /// Assumed product lifetime in years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<f64>,

    /// Assumed use region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_location: Option<String>,

    /// Yearly typical energy consumption in kWh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_tec: Option<f64>,

    /// Storage descriptor ("1 x 512GB SSD").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_drive: Option<String>,

    /// Memory in GB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,

    /// Number of CPUs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_cpu: Option<u32>,

    /// Share of the footprint from manufacturing (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_manufacturing_ratio: Option<f64>,

    /// Share of the footprint from use (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_use_ratio: Option<f64>,

    /// Share of the footprint from end of life (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_eol_ratio: Option<f64>,

    /// Share of the footprint from transport (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_transport_ratio: Option<f64>,

    /// Date the record was produced.
    pub added_date: NaiveDate,

    /// Parser that produced the record.
    pub add_method: String,
}

impl DeviceCarbonFootprint {
    /// Create a record with only the mandatory fields set.
    pub fn new(name: impl Into<String>, add_method: impl Into<String>, added_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            category: None,
            subcategory: None,
            gwp_total: None,
            gwp_error_ratio: None,
            report_date: None,
            weight: None,
            screen_size: None,
            assembly_location: None,
            lifetime: None,
            use_location: None,
            yearly_tec: None,
            hard_drive: None,
            memory: None,
            number_cpu: None,
            gwp_manufacturing_ratio: None,
            gwp_use_ratio: None,
            gwp_eol_ratio: None,
            gwp_transport_ratio: None,
            added_date,
            add_method: add_method.into(),
        }
    }

    /// The four lifecycle phase ratios, in manufacturing, use, end of life, transport order.
    pub fn phase_ratios(&self) -> [Option<f64>; 4] {
        [
            self.gwp_manufacturing_ratio,
            self.gwp_use_ratio,
            self.gwp_eol_ratio,
            self.gwp_transport_ratio,
        ]
    }

    /// Report suspicious values. Nothing here is enforced during parsing.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push("Device name is empty".to_string());
        }

        if let Some(total) = self.gwp_total {
            if total < 0.0 {
                issues.push(format!("Negative gwp_total: {}", total));
            }
        }

        let names = ["manufacturing", "use", "eol", "transport"];
        for (ratio, name) in self.phase_ratios().iter().zip(names) {
            if let Some(ratio) = ratio {
                if !(0.0..=1.0).contains(ratio) {
                    issues.push(format!("gwp_{}_ratio out of range: {}", name, ratio));
                }
            }
        }

        let ratios = self.phase_ratios();
        if ratios.iter().all(Option::is_some) {
            let sum: f64 = ratios.iter().flatten().sum();
            if (sum - 1.0).abs() > 0.02 {
                issues.push(format!("Phase ratios sum to {:.4}, expected about 1.0", sum));
            }
        }

        issues
    }
}
