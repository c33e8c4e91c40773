//! Product rankings by popularity and by price.

use crate::error::{Result, ResultExt};
use crate::types::{
    ACTUAL_PRICE, CleanedTable, PRODUCT_NAME, PriceSliceComparison, ProductPrice, ProductVotes,
    RATING_COUNT,
};
use polars::prelude::*;
use tracing::debug;

/// Position of each record in the cleaned table, carried through the sort.
const ROW: &str = "row";

/// Every product ordered by `rating_count`, most rated first.
///
/// Products with equal counts keep their table order.
pub fn rank_products_by_votes(table: &CleanedTable) -> Result<Vec<ProductVotes>> {
    let sorted = sort_descending(table, &[PRODUCT_NAME, RATING_COUNT], RATING_COUNT)?;

    let rows = sorted.count_column(ROW)?;
    let names = sorted.text_column(PRODUCT_NAME)?;
    let counts = sorted.numeric_column(RATING_COUNT)?;

    let ranking: Vec<ProductVotes> = rows
        .into_iter()
        .zip(names.into_iter().zip(counts))
        .map(|(row, (product_name, rating_count))| ProductVotes {
            row,
            product_name,
            rating_count,
        })
        .collect();

    debug!("Ranked {} products by rating count", ranking.len());
    Ok(ranking)
}

/// Every product ordered by `actual_price`, most expensive first.
///
/// Products with equal prices keep their table order.
pub fn rank_products_by_price(table: &CleanedTable) -> Result<Vec<ProductPrice>> {
    let sorted = sort_descending(
        table,
        &[PRODUCT_NAME, ACTUAL_PRICE, RATING_COUNT],
        ACTUAL_PRICE,
    )?;

    let rows = sorted.count_column(ROW)?;
    let names = sorted.text_column(PRODUCT_NAME)?;
    let prices = sorted.numeric_column(ACTUAL_PRICE)?;
    let counts = sorted.numeric_column(RATING_COUNT)?;

    let ranking: Vec<ProductPrice> = rows
        .into_iter()
        .zip(names)
        .zip(prices.into_iter().zip(counts))
        .map(|((row, product_name), (actual_price, rating_count))| ProductPrice {
            row,
            product_name,
            actual_price,
            rating_count,
        })
        .collect();

    debug!("Ranked {} products by price", ranking.len());
    Ok(ranking)
}

/// Select `columns`, tag each record with its row index, then stable-sort
/// descending on `key`.
fn sort_descending(table: &CleanedTable, columns: &[&str], key: &str) -> Result<CleanedTable> {
    table.require_columns(columns)?;

    let sorted = table
        .dataframe()
        .clone()
        .lazy()
        .select(columns.iter().map(|name| col(*name)).collect::<Vec<_>>())
        .with_row_index(ROW, None)
        .sort(
            [key],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()
        .context(format!("Failed to sort products by {}", key))?;

    Ok(CleanedTable::new(sorted))
}

/// The first `n` entries of an ordering, or all of them if there are fewer.
pub fn top_n<T>(ranking: &[T], n: usize) -> &[T] {
    &ranking[..n.min(ranking.len())]
}

/// The `n` most expensive products: a prefix of the price ranking.
pub fn most_expensive(ranking: &[ProductPrice], n: usize) -> &[ProductPrice] {
    top_n(ranking, n)
}

/// The `n` least expensive products: a suffix of the price ranking.
pub fn least_expensive(ranking: &[ProductPrice], n: usize) -> &[ProductPrice] {
    &ranking[ranking.len().saturating_sub(n)..]
}

/// Mean rating count of the `n` most and `n` least expensive products.
///
/// The slices overlap when the ranking holds fewer than `2 * n` products.
pub fn compare_price_slices(ranking: &[ProductPrice], n: usize) -> PriceSliceComparison {
    let mean = |slice: &[ProductPrice]| {
        if slice.is_empty() {
            0.0
        } else {
            slice.iter().map(|p| p.rating_count).sum::<f64>() / slice.len() as f64
        }
    };

    let expensive = most_expensive(ranking, n);
    PriceSliceComparison {
        slice_size: expensive.len(),
        expensive_mean_rating_count: mean(expensive),
        cheap_mean_rating_count: mean(least_expensive(ranking, n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SalesError;
    use crate::types::CATEGORY;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn table(names: &[&str], prices: &[f64], counts: &[f64]) -> CleanedTable {
        let categories = vec!["Electronics"; names.len()];
        CleanedTable::new(
            df!(
                PRODUCT_NAME => names,
                CATEGORY => categories,
                ACTUAL_PRICE => prices,
                RATING_COUNT => counts,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_votes_ranking_is_stable() {
        let table = table(
            &["five", "hundred-a", "hundred-b", "one"],
            &[1.0, 2.0, 3.0, 4.0],
            &[5.0, 100.0, 100.0, 1.0],
        );
        let ranking = rank_products_by_votes(&table).unwrap();

        let rows: Vec<usize> = ranking.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![1, 2, 0, 3]);
        assert_eq!(ranking[0].product_name, "hundred-a");
        assert_eq!(ranking[1].product_name, "hundred-b");
    }

    #[test]
    fn test_price_ranking() {
        let table = table(
            &["tv", "cable", "phone", "adapter"],
            &[49999.0, 399.0, 49999.0, 99.0],
            &[10.0, 20000.0, 300.0, 900.0],
        );
        let ranking = rank_products_by_price(&table).unwrap();

        let names: Vec<&str> = ranking.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["tv", "phone", "cable", "adapter"]);
    }

    #[test]
    fn test_most_and_least_expensive() {
        let table = table(
            &["a", "b", "c", "d", "e"],
            &[50.0, 40.0, 30.0, 20.0, 10.0],
            &[1.0, 2.0, 3.0, 4.0, 5.0],
        );
        let ranking = rank_products_by_price(&table).unwrap();

        let expensive: Vec<&str> = most_expensive(&ranking, 2)
            .iter()
            .map(|p| p.product_name.as_str())
            .collect();
        let cheap: Vec<&str> = least_expensive(&ranking, 2)
            .iter()
            .map(|p| p.product_name.as_str())
            .collect();

        assert_eq!(expensive, vec!["a", "b"]);
        assert_eq!(cheap, vec!["d", "e"]);
        assert_eq!(least_expensive(&ranking, 10).len(), 5);
    }

    #[test]
    fn test_top_n_clamps() {
        let values = [1, 2, 3];
        assert_eq!(top_n(&values, 2), &[1, 2]);
        assert_eq!(top_n(&values, 10), &[1, 2, 3]);
        assert!(top_n(&values, 0).is_empty());
    }

    #[test]
    fn test_compare_price_slices() {
        let table = table(
            &["tv", "phone", "cable", "adapter"],
            &[40000.0, 20000.0, 300.0, 100.0],
            &[10.0, 30.0, 5000.0, 3000.0],
        );
        let ranking = rank_products_by_price(&table).unwrap();
        let comparison = compare_price_slices(&ranking, 2);

        assert_eq!(comparison.slice_size, 2);
        assert_eq!(comparison.expensive_mean_rating_count, 20.0);
        assert_eq!(comparison.cheap_mean_rating_count, 4000.0);
        assert!(comparison.cheap_sells_more());
    }

    #[test]
    fn test_ranking_requires_columns() {
        let table = CleanedTable::new(df!(PRODUCT_NAME => ["tv"]).unwrap());
        let err = rank_products_by_price(&table).unwrap_err();
        assert!(matches!(err, SalesError::ColumnNotFound(ref col) if col == ACTUAL_PRICE));
    }

    #[test]
    fn test_rankings_of_empty_table() {
        let table = table(&[], &[], &[]);
        assert!(rank_products_by_votes(&table).unwrap().is_empty());
        let ranking = rank_products_by_price(&table).unwrap();
        assert!(least_expensive(&ranking, 3).is_empty());
        assert_eq!(compare_price_slices(&ranking, 3).slice_size, 0);
    }
}
