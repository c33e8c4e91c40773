//! Missing-cell and missing-row measurements.

use crate::utils::{null_cell_count, row_null_counts};
use polars::prelude::*;

/// Measures how incomplete a table is.
///
/// All fractions are in `[0.0, 1.0]`. A table with no cells (no rows or no
/// columns) counts as complete.
pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Fraction of null cells over every cell of the table.
    pub fn missing_fraction(df: &DataFrame) -> f64 {
        let size = df.height() * df.width();
        if size == 0 {
            return 0.0;
        }
        null_cell_count(df) as f64 / size as f64
    }

    /// Fraction of rows holding at least one null cell.
    pub fn rows_with_missing_fraction(df: &DataFrame) -> PolarsResult<f64> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(0.0);
        }
        let counts = row_null_counts(df)?;
        let incomplete = counts
            .u32()?
            .into_iter()
            .filter(|count| count.unwrap_or(0) > 0)
            .count();
        Ok(incomplete as f64 / df.height() as f64)
    }

    /// Share of non-null cells, the complement of [`Self::missing_fraction`].
    pub fn completeness_score(df: &DataFrame) -> f64 {
        1.0 - Self::missing_fraction(df)
    }

    /// Warning text when missing values survived the missing-row step.
    ///
    /// Names the columns that still hold nulls, since those are the columns
    /// the per-column cleaning did not anticipate.
    pub fn residual_warning(df: &DataFrame) -> Option<String> {
        let fraction = Self::missing_fraction(df);
        if fraction == 0.0 {
            return None;
        }

        let columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| col.name().to_string())
            .collect();

        Some(format!(
            "Some missing data remains ({:.2}%) in columns {:?}; further cleaning needed",
            fraction * 100.0,
            columns
        ))
    }
}
