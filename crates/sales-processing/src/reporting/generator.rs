use crate::analysis::{
    aggregate_votes_by_category, compare_price_slices, least_expensive, most_expensive,
    rank_products_by_price, rank_products_by_votes, top_n,
};
use crate::config::{DisplayLimits, LabelRule};
use crate::error::Result;
use crate::reporting::display::truncate_label;
use crate::types::{
    CategoryVotes, CleaningOutcome, CleaningSummary, PriceSliceComparison, ProductPrice,
    ProductVotes,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Everything the console narration needs, with labels already shortened.
///
/// Serialized as-is for `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path of the CSV snapshot
    pub input_file: String,

    /// What the cleaning pass did
    pub cleaning: CleaningSummary,

    /// Most rated products, most rated first
    pub most_voted: Vec<ProductVotes>,
    /// Best-selling products called out by name
    pub podium: Vec<ProductVotes>,

    /// Most expensive products, most expensive first
    pub most_expensive: Vec<ProductPrice>,
    /// Least expensive products, in price-ranking order
    pub least_expensive: Vec<ProductPrice>,
    /// Average rating count of the two price slices
    pub price_comparison: PriceSliceComparison,

    /// Rating totals per category, largest first
    pub category_totals: Vec<CategoryVotes>,
    /// Most voted categories called out by name
    pub top_categories: Vec<CategoryVotes>,
    /// Category with the fewest ratings
    pub least_voted_category: Option<CategoryVotes>,
}

/// Builds [`SalesReport`]s from cleaned tables.
pub struct ReportGenerator {
    limits: DisplayLimits,
}

impl ReportGenerator {
    pub fn new(limits: DisplayLimits) -> Self {
        Self { limits }
    }

    /// Run the rankings and aggregation over `outcome` and assemble the report.
    pub fn build_report(&self, input_file: &str, outcome: &CleaningOutcome) -> Result<SalesReport> {
        info!("Building sales report...");
        let limits = &self.limits;
        let table = &outcome.table;

        let by_votes = rank_products_by_votes(table)?;
        let most_voted = shorten_products(top_n(&by_votes, limits.top_voted), limits.vote_label);
        let podium = top_n(&most_voted, limits.podium).to_vec();

        let by_price = rank_products_by_price(table)?;
        let price_comparison = compare_price_slices(&by_price, limits.price_slice);
        let most_expensive =
            shorten_prices(most_expensive(&by_price, limits.price_slice), limits.price_label);
        let least_expensive =
            shorten_prices(least_expensive(&by_price, limits.price_slice), limits.price_label);

        let categories = aggregate_votes_by_category(table)?;
        let category_totals = shorten_categories(&categories, limits.category_label);
        let top_categories = top_n(&category_totals, limits.podium).to_vec();
        let least_voted_category = category_totals.last().cloned();

        debug!(
            "Report covers {} products and {} categories",
            by_votes.len(),
            category_totals.len()
        );

        Ok(SalesReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            cleaning: outcome.summary.clone(),
            most_voted,
            podium,
            most_expensive,
            least_expensive,
            price_comparison,
            category_totals,
            top_categories,
            least_voted_category,
        })
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(DisplayLimits::default())
    }
}

fn shorten_products(products: &[ProductVotes], rule: LabelRule) -> Vec<ProductVotes> {
    products
        .iter()
        .map(|p| ProductVotes {
            product_name: truncate_label(&p.product_name, rule),
            ..p.clone()
        })
        .collect()
}

fn shorten_prices(products: &[ProductPrice], rule: LabelRule) -> Vec<ProductPrice> {
    products
        .iter()
        .map(|p| ProductPrice {
            product_name: truncate_label(&p.product_name, rule),
            ..p.clone()
        })
        .collect()
}

fn shorten_categories(categories: &[CategoryVotes], rule: LabelRule) -> Vec<CategoryVotes> {
    categories
        .iter()
        .map(|c| CategoryVotes {
            category: truncate_label(&c.category, rule),
            ..c.clone()
        })
        .collect()
}
