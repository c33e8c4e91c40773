//! Orderings and aggregations over a cleaned sales table.
//!
//! All orderings are stable: records with equal keys keep their relative
//! order from the cleaned table.

mod aggregation;
mod ranking;

pub use aggregation::aggregate_votes_by_category;
pub use ranking::{
    compare_price_slices, least_expensive, most_expensive, rank_products_by_price,
    rank_products_by_votes, top_n,
};
