//! Report assembly for the console narration.
//!
//! Rankings and aggregations are computed in [`crate::analysis`]; this module
//! takes the slices the narration shows and shortens their labels. Nothing
//! here writes to disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use sales_processing::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::new(config.display).build_report("data/amazon_sales.csv", &outcome)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod display;
mod generator;

pub use display::truncate_label;
pub use generator::{ReportGenerator, SalesReport};
