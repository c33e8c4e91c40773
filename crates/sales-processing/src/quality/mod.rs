//! Missing-value measurements used before and after the missing-row step.

mod analyzer;

pub use analyzer::DataQualityAnalyzer;
