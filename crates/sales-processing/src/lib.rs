//! Online Store Sales Processing Library
//!
//! Cleans a static CSV snapshot of online-store sales and computes the
//! orderings and aggregations used for reporting, built on Polars.
//!
//! # Overview
//!
//! - **Loading**: every column read as text, missing source is fatal
//! - **Cleaning**: unused columns dropped, price/rating text normalised to
//!   numbers (unparseable cells become null), incomplete rows removed
//! - **Analysis**: products ranked by rating count and by price, rating
//!   counts summed per category
//! - **Reporting**: shortened labels and a serializable report for the CLI
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_processing::{Pipeline, SalesConfig};
//! use sales_processing::analysis::{aggregate_votes_by_category, rank_products_by_votes, top_n};
//!
//! let outcome = Pipeline::builder()
//!     .config(SalesConfig::default())
//!     .build()?
//!     .load_and_clean("data/amazon_sales.csv")?;
//!
//! let ranking = rank_products_by_votes(&outcome.table)?;
//! for product in top_n(&ranking, 3) {
//!     println!("{}: {}", product.product_name, product.rating_count);
//! }
//!
//! for category in aggregate_votes_by_category(&outcome.table)? {
//!     println!("{}: {}", category.category, category.total_rating_count);
//! }
//! ```

pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{
    aggregate_votes_by_category, rank_products_by_price, rank_products_by_votes,
};
pub use cleaner::{SalesCleaner, parse_amount};
pub use config::{ConfigValidationError, DisplayLimits, LabelRule, SalesConfig, SalesConfigBuilder};
pub use error::{Result as SalesResult, ResultExt, SalesError};
pub use loader::load_sales_csv;
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use quality::DataQualityAnalyzer;
pub use reporting::{ReportGenerator, SalesReport, truncate_label};
pub use types::{
    CategoryVotes, CleanedTable, CleaningOutcome, CleaningSummary, ColumnNormalization,
    PriceSliceComparison, ProductPrice, ProductVotes, SalesRecord,
};

/// Load the CSV at `source` and clean it with the default rules.
///
/// Returns the cleaned table; use [`load_and_clean_with_summary`] to also get
/// what the cleaning did.
pub fn load_and_clean(source: impl AsRef<std::path::Path>) -> SalesResult<CleanedTable> {
    Ok(load_and_clean_with_summary(source)?.table)
}

/// Like [`load_and_clean`], keeping the [`CleaningSummary`].
pub fn load_and_clean_with_summary(
    source: impl AsRef<std::path::Path>,
) -> SalesResult<CleaningOutcome> {
    Pipeline::builder().build()?.load_and_clean(source)
}
