//! Cleaning stages for raw sales records.
//!
//! Each stage takes the table by value and hands back the transformed table,
//! so stages can be run and tested on their own:
//! - Drop columns that never take part in the analysis
//! - Normalise price/rating text into `Float64`
//! - Remove every row that still holds a null

mod converters;
mod sanitizers;

pub use converters::parse_amount;
pub use sanitizers::{
    SPECIAL_CHARS, remove_thousands_separators, strip_special_chars, symbol_pattern,
};

use crate::config::SalesConfig;
use crate::types::ColumnNormalization;
use crate::utils::{column_names, row_null_counts};
use anyhow::Result;
use polars::prelude::*;
use regex::Regex;
use tracing::{debug, info};

/// Applies the fixed cleaning rules of a [`SalesConfig`].
#[derive(Debug, Clone)]
pub struct SalesCleaner {
    dropped_columns: Vec<String>,
    numeric_columns: Vec<String>,
    symbols: Regex,
}

impl SalesCleaner {
    /// Compile the cleaning rules of `config`.
    pub fn new(config: &SalesConfig) -> Result<Self> {
        Ok(Self {
            dropped_columns: config.dropped_columns.clone(),
            numeric_columns: config.numeric_columns.clone(),
            symbols: symbol_pattern(&config.special_chars)?,
        })
    }

    /// Remove the configured unused columns.
    ///
    /// Returns the table and the names of the columns actually removed;
    /// configured columns absent from the table are ignored.
    pub fn drop_unused_columns(&self, df: DataFrame) -> (DataFrame, Vec<String>) {
        let present = column_names(&df);
        let to_drop: Vec<String> = self
            .dropped_columns
            .iter()
            .filter(|col| present.contains(col))
            .cloned()
            .collect();

        if to_drop.is_empty() {
            debug!("No unused columns to drop");
            return (df, to_drop);
        }

        let cols_ref: Vec<PlSmallStr> = to_drop.iter().map(|s| s.as_str().into()).collect();
        let df = df.drop_many(cols_ref);
        debug!("Dropped {} unused columns: {:?}", to_drop.len(), to_drop);

        (df, to_drop)
    }

    /// Convert each configured numeric column that is present into `Float64`.
    ///
    /// Cells that do not parse become null; they are counted, never raised.
    pub fn normalize_numeric_columns(
        &self,
        df: DataFrame,
    ) -> Result<(DataFrame, Vec<ColumnNormalization>)> {
        let mut df = df;
        let mut normalized = Vec::new();

        for col_name in &self.numeric_columns {
            let Ok(col) = df.column(col_name) else {
                debug!("Numeric column '{}' not present, skipping", col_name);
                continue;
            };

            let series = col.as_materialized_series();
            let (converted, unparseable) = converters::string_to_amount(series, &self.symbols)?;
            df.replace(col_name, converted)?;

            if unparseable > 0 {
                debug!(
                    "Column '{}': {} cells could not be parsed and became null",
                    col_name, unparseable
                );
            }
            normalized.push(ColumnNormalization {
                column: col_name.clone(),
                unparseable_cells: unparseable,
            });
        }

        info!("Normalised {} numeric columns", normalized.len());
        Ok((df, normalized))
    }

    /// Remove every row holding at least one null cell.
    ///
    /// Returns the table and the number of rows removed.
    pub fn drop_missing_rows(&self, df: DataFrame) -> Result<(DataFrame, usize)> {
        let before_rows = df.height();
        if df.width() == 0 || before_rows == 0 {
            return Ok((df, 0));
        }

        let null_counts = row_null_counts(&df)?;
        let mask = null_counts.equal(0u32)?;
        let df = df.filter(&mask)?;

        let rows_removed = before_rows - df.height();
        debug!("Removed {} rows with missing values", rows_removed);

        Ok((df, rows_removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cleaner() -> SalesCleaner {
        SalesCleaner::new(&SalesConfig::default()).unwrap()
    }

    fn raw_sales() -> DataFrame {
        df!(
            "product_id" => ["B07JW9H4J1", "B098NS6PVG", "B096MSW6CT"],
            "product_name" => ["Wayona Nylon Braided USB Cable", "Ambrane Cable", "Sounce Fast Charging Cable"],
            "category" => ["Computers&Accessories|Cables", "Computers&Accessories|Cables", "Electronics|Mobiles"],
            "discounted_price" => ["₹399", "₹199", "₹199"],
            "actual_price" => ["₹1,099", "₹349", "₹1,899"],
            "discount_percentage" => ["64%", "43%", "90%"],
            "rating" => ["4.2", "4.0", "|"],
            "rating_count" => ["24,269", "43,994", "7,928"],
            "user_id" => ["u1", "u2", "u3"],
        )
        .unwrap()
    }

    #[test]
    fn test_drop_unused_columns() {
        let (df, dropped) = cleaner().drop_unused_columns(raw_sales());

        assert_eq!(dropped, vec!["product_id", "discount_percentage", "user_id"]);
        assert_eq!(
            column_names(&df),
            vec![
                "product_name",
                "category",
                "discounted_price",
                "actual_price",
                "rating",
                "rating_count"
            ]
        );
    }

    #[test]
    fn test_drop_unused_columns_without_any() {
        let df = df!("product_name" => ["a"], "rating" => ["4.0"]).unwrap();
        let (df, dropped) = cleaner().drop_unused_columns(df);
        assert!(dropped.is_empty());
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_normalize_numeric_columns() {
        let (df, _) = cleaner().drop_unused_columns(raw_sales());
        let (df, normalized) = cleaner().normalize_numeric_columns(df).unwrap();

        for col in ["actual_price", "discounted_price", "rating", "rating_count"] {
            assert_eq!(df.column(col).unwrap().dtype(), &DataType::Float64);
        }

        let actual: Vec<Option<f64>> = df
            .column("actual_price")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(actual, vec![Some(1099.0), Some(349.0), Some(1899.0)]);

        let rating = normalized.iter().find(|n| n.column == "rating").unwrap();
        assert_eq!(rating.unparseable_cells, 1);
        assert_eq!(df.column("rating").unwrap().null_count(), 1);
    }

    #[test]
    fn test_normalize_skips_absent_columns() {
        let df = df!("rating" => ["4.5"]).unwrap();
        let (df, normalized) = cleaner().normalize_numeric_columns(df).unwrap();

        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].column, "rating");
        assert_eq!(df.column("rating").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_drop_missing_rows() {
        let df = df!(
            "category" => [Some("A"), None, Some("C")],
            "rating" => [Some(4.0), Some(3.0), None],
            "rating_count" => [Some(1.0), Some(2.0), Some(3.0)],
        )
        .unwrap();

        let (df, removed) = cleaner().drop_missing_rows(df).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.column("category").unwrap().str().unwrap().get(0),
            Some("A")
        );
    }

    #[test]
    fn test_drop_missing_rows_keeps_complete_table() {
        let df = df!("rating" => [4.0, 3.5]).unwrap();
        let (df, removed) = cleaner().drop_missing_rows(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_custom_symbols() {
        let config = SalesConfig::builder()
            .special_chars(vec!['£'])
            .build()
            .unwrap();
        let cleaner = SalesCleaner::new(&config).unwrap();
        let df = df!("actual_price" => ["£1,250", "₹300"]).unwrap();
        let (df, normalized) = cleaner.normalize_numeric_columns(df).unwrap();

        let actual: Vec<Option<f64>> = df
            .column("actual_price")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(actual, vec![Some(1250.0), None]);
        assert_eq!(normalized[0].unparseable_cells, 1);
    }
}
