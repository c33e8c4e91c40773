use crate::error::{Result, SalesError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column holding the product display label.
pub const PRODUCT_NAME: &str = "product_name";
/// Column holding the `|`-separated category path.
pub const CATEGORY: &str = "category";
pub const ACTUAL_PRICE: &str = "actual_price";
pub const DISCOUNTED_PRICE: &str = "discounted_price";
pub const RATING: &str = "rating";
pub const RATING_COUNT: &str = "rating_count";

/// One row of the cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_name: String,
    pub category: String,
    pub actual_price: f64,
    pub discounted_price: f64,
    pub rating: f64,
    pub rating_count: f64,
}

/// The in-memory table after pruning, numeric normalisation and
/// missing-row removal.
///
/// Owned exclusively by whoever holds it; nothing else observes it.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    df: DataFrame,
}

impl CleanedTable {
    /// Wrap an already cleaned DataFrame.
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Text values of a column, in row order.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>> {
        let column = self
            .df
            .column(name)
            .map_err(|_| SalesError::ColumnNotFound(name.to_string()))?;
        let text = column.as_materialized_series().cast(&DataType::String)?;

        text.str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .map(str::to_string)
                    .ok_or_else(|| null_cell(name, row))
            })
            .collect()
    }

    /// Numeric values of a column as `f64`, in row order.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = self
            .df
            .column(name)
            .map_err(|_| SalesError::ColumnNotFound(name.to_string()))?;
        let numbers = column.as_materialized_series().cast(&DataType::Float64)?;

        numbers
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| value.ok_or_else(|| null_cell(name, row)))
            .collect()
    }

    /// Fail with [`SalesError::ColumnNotFound`] on the first absent column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| self.df.column(name).is_err()) {
            Some(missing) => Err(SalesError::ColumnNotFound(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Non-negative integer values of a column (row indices, group sizes).
    pub fn count_column(&self, name: &str) -> Result<Vec<usize>> {
        let column = self
            .df
            .column(name)
            .map_err(|_| SalesError::ColumnNotFound(name.to_string()))?;
        let counts = column.as_materialized_series().cast(&DataType::UInt64)?;

        counts
            .u64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .map(|n| n as usize)
                    .ok_or_else(|| null_cell(name, row))
            })
            .collect()
    }

    /// Typed view of every row.
    pub fn records(&self) -> Result<Vec<SalesRecord>> {
        let names = self.text_column(PRODUCT_NAME)?;
        let categories = self.text_column(CATEGORY)?;
        let actual = self.numeric_column(ACTUAL_PRICE)?;
        let discounted = self.numeric_column(DISCOUNTED_PRICE)?;
        let ratings = self.numeric_column(RATING)?;
        let counts = self.numeric_column(RATING_COUNT)?;

        Ok(names
            .into_iter()
            .zip(categories)
            .zip(actual.into_iter().zip(discounted))
            .zip(ratings.into_iter().zip(counts))
            .map(
                |(((product_name, category), (actual_price, discounted_price)), (rating, rating_count))| {
                    SalesRecord {
                        product_name,
                        category,
                        actual_price,
                        discounted_price,
                        rating,
                        rating_count,
                    }
                },
            )
            .collect())
    }
}

fn null_cell(column: &str, row: usize) -> SalesError {
    SalesError::CleaningFailed(format!(
        "null value in column '{}' at row {} of a cleaned table",
        column, row
    ))
}

/// Outcome of normalising one numeric column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNormalization {
    pub column: String,
    /// Cells that held text but did not parse and became null.
    pub unparseable_cells: usize,
}

/// What the cleaning pass did to the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_dropped: usize,

    pub columns_before: usize,
    pub columns_after: usize,
    pub dropped_columns: Vec<String>,

    pub normalized_columns: Vec<ColumnNormalization>,

    /// Null cells over all cells, before the missing-row step (0.0 - 1.0).
    pub missing_fraction_before: f64,
    /// Rows holding at least one null, before the missing-row step (0.0 - 1.0).
    pub rows_with_missing_fraction_before: f64,
    /// Null cells over all cells in the cleaned table (0.0 - 1.0).
    pub missing_fraction_after: f64,

    /// Set when nulls survived the missing-row step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_warning: Option<String>,

    /// Human-readable log of the cleaning actions, in order.
    pub actions: Vec<String>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: impl Into<String>) {
        self.actions.push(action.into());
    }

    /// Cells that failed numeric parsing, across all normalised columns.
    pub fn unparseable_cells(&self) -> usize {
        self.normalized_columns
            .iter()
            .map(|col| col.unparseable_cells)
            .sum()
    }

    /// Percentage of rows removed by cleaning.
    pub fn rows_dropped_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_dropped as f64 / self.rows_before as f64) * 100.0
        }
    }

    /// Whether the cleaned table is free of nulls.
    pub fn is_clean(&self) -> bool {
        self.residual_warning.is_none()
    }
}

/// A cleaned table with the summary of how it was produced.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: CleanedTable,
    pub summary: CleaningSummary,
}

/// A product and its number of ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVotes {
    /// Position of the record in the cleaned table.
    pub row: usize,
    pub product_name: String,
    pub rating_count: f64,
}

/// A product with its list price and number of ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub row: usize,
    pub product_name: String,
    pub actual_price: f64,
    pub rating_count: f64,
}

/// Total ratings for one exact category string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVotes {
    pub category: String,
    pub total_rating_count: f64,
    /// Number of records in the category.
    pub products: usize,
}

/// Average popularity of the most and least expensive slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSliceComparison {
    pub slice_size: usize,
    pub expensive_mean_rating_count: f64,
    pub cheap_mean_rating_count: f64,
}

impl PriceSliceComparison {
    /// Whether the cheap slice collected more ratings on average.
    pub fn cheap_sells_more(&self) -> bool {
        self.cheap_mean_rating_count > self.expensive_mean_rating_count
    }
}
