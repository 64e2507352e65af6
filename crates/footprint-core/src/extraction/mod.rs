//! Field extraction from vendor carbon footprint reports.

pub mod coercion;
pub mod parser;
pub mod patterns;
pub mod recovery;
pub mod search;
pub mod vendor;

pub use parser::FootprintParser;
pub use recovery::{recover_phase_ratios, RecoveredRatios};
pub use search::{search_all_patterns, FieldMap};
pub use vendor::VendorProfile;
