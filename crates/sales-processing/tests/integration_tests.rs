//! Integration tests for the sales cleaning pipeline and analysis.
//!
//! These tests run the library end to end on a small snapshot that mimics the
//! real export: currency symbols, thousands separators, quoted fields with
//! commas and a few unusable ratings.

use pretty_assertions::assert_eq;
use sales_processing::analysis::{least_expensive, most_expensive, top_n};
use sales_processing::{
    Pipeline, PipelineStage, ProgressUpdate, ReportGenerator, SalesConfig, SalesError,
    aggregate_votes_by_category, load_and_clean, load_and_clean_with_summary, load_sales_csv,
    rank_products_by_price, rank_products_by_votes,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_path() -> PathBuf {
    fixtures_path().join("amazon_sales_sample.csv")
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_loader_reads_every_column_as_text() {
    let df = load_sales_csv(sample_path()).unwrap();

    assert_eq!(df.shape(), (8, 16));
    for column in df.get_columns() {
        assert_eq!(column.dtype(), &polars::prelude::DataType::String);
    }
}

#[test]
fn test_missing_source_aborts() {
    let err = load_and_clean(fixtures_path().join("no_such_file.csv")).unwrap_err();

    assert!(matches!(err, SalesError::SourceNotFound(_)));
    assert!(err.is_setup_failure());
    assert_eq!(err.error_code(), "SOURCE_NOT_FOUND");
}

#[test]
fn test_malformed_source_aborts() {
    let err = load_sales_csv(fixtures_path().join("malformed_quotes.csv")).unwrap_err();

    assert!(matches!(err, SalesError::SourceUnreadable { .. }));
    assert!(err.is_setup_failure());
    assert_eq!(err.error_code(), "SOURCE_UNREADABLE");

    let err = load_and_clean(fixtures_path().join("malformed_quotes.csv")).unwrap_err();
    assert_eq!(err.error_code(), "SOURCE_UNREADABLE");
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_clean_sample_snapshot() {
    let outcome = load_and_clean_with_summary(sample_path()).unwrap();
    let summary = &outcome.summary;
    let table = &outcome.table;

    assert_eq!(summary.rows_before, 8);
    assert_eq!(summary.rows_after, 5);
    assert_eq!(summary.rows_dropped, 3);
    assert_eq!(summary.columns_before, 16);
    assert_eq!(summary.columns_after, 6);
    assert_eq!(summary.dropped_columns.len(), 10);

    let columns: Vec<String> = table
        .dataframe()
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        columns,
        vec![
            "product_name",
            "category",
            "discounted_price",
            "actual_price",
            "rating",
            "rating_count"
        ]
    );

    // "|" and "4.0 out of 5 stars"
    let rating = summary
        .normalized_columns
        .iter()
        .find(|col| col.column == "rating")
        .unwrap();
    assert_eq!(rating.unparseable_cells, 2);

    assert!((summary.rows_with_missing_fraction_before - 0.375).abs() < 1e-12);
    assert!(summary.missing_fraction_before > 0.0);
    assert_eq!(summary.missing_fraction_after, 0.0);
    assert!(summary.is_clean());
}

#[test]
fn test_cleaned_values_are_numbers() {
    let table = load_and_clean(sample_path()).unwrap();
    let records = table.records().unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(records[0].product_name, "Wayona Nylon Braided USB to Lightning Cable");
    assert_eq!(records[0].actual_price, 1099.0);
    assert_eq!(records[0].discounted_price, 399.0);
    assert_eq!(records[0].rating_count, 24269.0);

    assert_eq!(records[1].product_name, "Samsung Galaxy M13 (Aqua Green, 6GB, 128GB)");
    assert_eq!(records[1].discounted_price, 10499.0);
    assert_eq!(records[1].actual_price, 14999.0);
    assert_eq!(records[1].rating, 4.1);
}

#[test]
fn test_cleaning_is_idempotent() {
    let pipeline = Pipeline::builder().build().unwrap();
    let first = pipeline.load_and_clean(sample_path()).unwrap();
    let second = pipeline.process(first.table.dataframe().clone()).unwrap();

    assert!(first.table.dataframe().equals(second.table.dataframe()));
    assert_eq!(second.summary.rows_dropped, 0);
    assert!(second.summary.dropped_columns.is_empty());
    assert_eq!(second.summary.missing_fraction_before, 0.0);
}

#[test]
fn test_progress_reaches_completion() {
    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);

    Pipeline::builder()
        .on_progress(move |update| sink.lock().unwrap().push(update))
        .build()
        .unwrap()
        .load_and_clean(sample_path())
        .unwrap();

    let updates = updates.lock().unwrap();
    assert_eq!(updates.first().unwrap().stage, PipelineStage::Loading);
    assert_eq!(updates.last().unwrap().stage, PipelineStage::Complete);
    assert!(
        updates
            .windows(2)
            .all(|pair| pair[0].progress <= pair[1].progress)
    );
}

// ============================================================================
// Analysis
// ============================================================================

#[test]
fn test_rankings_on_sample() {
    let table = load_and_clean(sample_path()).unwrap();

    let by_votes = rank_products_by_votes(&table).unwrap();
    let rows: Vec<usize> = by_votes.iter().map(|p| p.row).collect();
    assert_eq!(rows, vec![0, 1, 3, 2, 4]);

    let podium: Vec<&str> = top_n(&by_votes, 3)
        .iter()
        .map(|p| p.product_name.as_str())
        .collect();
    assert_eq!(
        podium,
        vec![
            "Wayona Nylon Braided USB to Lightning Cable",
            "Samsung Galaxy M13 (Aqua Green, 6GB, 128GB)",
            "Portronics Konnect L"
        ]
    );

    let by_price = rank_products_by_price(&table).unwrap();
    let prices: Vec<f64> = by_price.iter().map(|p| p.actual_price).collect();
    assert_eq!(prices, vec![14999.0, 1099.0, 699.0, 399.0, 399.0]);

    // Equal prices keep table order
    let cheapest: Vec<&str> = least_expensive(&by_price, 2)
        .iter()
        .map(|p| p.product_name.as_str())
        .collect();
    assert_eq!(cheapest, vec!["Portronics Konnect L", "Car Mount"]);
    assert_eq!(most_expensive(&by_price, 10).len(), 5);
}

#[test]
fn test_category_totals_on_sample() {
    let table = load_and_clean(sample_path()).unwrap();
    let totals = aggregate_votes_by_category(&table).unwrap();

    let flat: Vec<(&str, f64)> = totals
        .iter()
        .map(|c| (c.category.as_str(), c.total_rating_count))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("Computers&Accessories|Accessories&Peripherals|Cables", 32197.0),
            ("Electronics|Mobiles&Accessories|Smartphones", 18998.0),
            ("Electronics|Mobiles&Accessories|Cables", 16905.0),
            ("Car&Motorbike|CarAccessories", 12.0),
        ]
    );
    assert_eq!(totals[0].products, 2);
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_report_from_sample() {
    let config = SalesConfig::builder()
        .source_path(sample_path())
        .top_voted(4)
        .price_slice(2)
        .build()
        .unwrap();
    let pipeline = Pipeline::builder().config(config.clone()).build().unwrap();
    let outcome = pipeline.run().unwrap();

    let report = ReportGenerator::new(config.display)
        .build_report("amazon_sales_sample.csv", &outcome)
        .unwrap();

    assert_eq!(report.most_voted.len(), 4);
    assert_eq!(report.podium.len(), 3);
    assert_eq!(report.podium[2].product_name, "Portronics Konnect L...");
    assert_eq!(report.most_expensive.len(), 2);
    assert_eq!(report.most_expensive[0].product_name, "Samsung Galaxy ...");
    assert!(!report.price_comparison.cheap_sells_more());

    let least = report.least_voted_category.unwrap();
    assert_eq!(least.category, "Car&Motorbike|CarAccessories...");
    assert_eq!(least.total_rating_count, 12.0);
    assert_eq!(report.cleaning.rows_after, 5);
}
