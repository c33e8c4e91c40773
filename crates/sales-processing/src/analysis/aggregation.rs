//! Per-category vote totals.

use crate::error::{Result, ResultExt};
use crate::types::{CATEGORY, CategoryVotes, CleanedTable, RATING_COUNT};
use polars::prelude::*;
use tracing::debug;

const TOTAL: &str = "total_rating_count";
const PRODUCTS: &str = "products";

/// Sum `rating_count` per exact `category` string, largest total first.
///
/// Category strings are compared byte for byte: spelling, whitespace and case
/// variants form separate groups. Groups with equal totals are ordered by
/// category name.
pub fn aggregate_votes_by_category(table: &CleanedTable) -> Result<Vec<CategoryVotes>> {
    table.require_columns(&[CATEGORY, RATING_COUNT])?;

    let grouped = table
        .dataframe()
        .clone()
        .lazy()
        .group_by([col(CATEGORY)])
        .agg([
            col(RATING_COUNT).cast(DataType::Float64).sum().alias(TOTAL),
            len().alias(PRODUCTS),
        ])
        .sort_by_exprs(
            [col(TOTAL), col(CATEGORY)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_maintain_order(true),
        )
        .collect()
        .context("Failed to aggregate rating counts by category")?;

    let grouped = CleanedTable::new(grouped);
    let categories = grouped.text_column(CATEGORY)?;
    let totals = grouped.numeric_column(TOTAL)?;
    let products = grouped.count_column(PRODUCTS)?;

    let votes: Vec<CategoryVotes> = categories
        .into_iter()
        .zip(totals.into_iter().zip(products))
        .map(|(category, (total_rating_count, products))| CategoryVotes {
            category,
            total_rating_count,
            products,
        })
        .collect();

    debug!("Aggregated rating counts into {} categories", votes.len());
    Ok(votes)
}
