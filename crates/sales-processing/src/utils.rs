//! Shared helpers for column bookkeeping and null counting.

use polars::prelude::*;

/// Owned column names of a DataFrame, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Total number of null cells across every column.
pub fn null_cell_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

/// Number of null cells in each row, as a `UInt32` series of length `df.height()`.
pub fn row_null_counts(df: &DataFrame) -> PolarsResult<Series> {
    let mut null_counts = Series::new("nulls".into(), vec![0u32; df.height()]);
    for col in df.get_columns() {
        let null_int = col
            .as_materialized_series()
            .is_null()
            .cast(&DataType::UInt32)?;
        null_counts = (&null_counts + &null_int)?;
    }
    Ok(null_counts)
}
