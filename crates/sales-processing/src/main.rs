//! CLI entry point for the sales analysis.

use anyhow::{Result, anyhow};
use clap::Parser;
use sales_processing::config::DEFAULT_SOURCE_PATH;
use sales_processing::{CleaningSummary, Pipeline, ReportGenerator, SalesConfig, SalesReport};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Online store sales analysis",
    long_about = "Cleans a CSV snapshot of online-store sales and reports the most rated \
                  products, the most and least expensive products, and rating totals per \
                  category.\n\n\
                  EXAMPLES:\n  \
                  # Analyse the default snapshot\n  \
                  sales-processing\n\n  \
                  # Another file, top 10 only\n  \
                  sales-processing -i data/other.csv --top 10\n\n  \
                  # Machine-readable output\n  \
                  sales-processing --json | jq .podium"
)]
struct Args {
    /// Path to the sales CSV file
    #[arg(short, long, default_value = DEFAULT_SOURCE_PATH)]
    input: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the final report)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logs; only the final report is written.
    #[arg(long)]
    json: bool,

    /// Number of most rated products to list
    #[arg(long, default_value = "50")]
    top: usize,

    /// Number of products and categories called out by name
    #[arg(long, default_value = "3")]
    podium: usize,

    /// Size of the most/least expensive product slices
    #[arg(long, default_value = "20")]
    price_slice: usize,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only holds JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = SalesConfig::builder()
        .source_path(&args.input)
        .top_voted(args.top)
        .podium(args.podium)
        .price_slice(args.price_slice)
        .build()?;

    let mut builder = Pipeline::builder().config(config.clone());
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    let outcome = pipeline.run().map_err(|e| {
        error!("Sales analysis failed: {}", e);
        anyhow!("Sales analysis failed: {}", e)
    })?;

    let report = ReportGenerator::new(config.display).build_report(&args.input, &outcome)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report);
    Ok(())
}

/// Narrate the cleaning steps and the report on stdout.
///
/// Uses `println!` on purpose: this is the program's output, visible
/// regardless of the log level.
fn print_human_readable_summary(report: &SalesReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ONLINE STORE SALES ANALYSIS");
    println!("{}", "=".repeat(80));
    println!("Input: {}", report.input_file);
    println!();

    print_cleaning(&report.cleaning);

    // Best-selling products
    println!("MOST RATED PRODUCTS (top {})", report.most_voted.len());
    println!("{}", "-".repeat(40));
    for (rank, product) in report.most_voted.iter().enumerate() {
        println!(
            "  {:>3}. {:<55} {:>10.0}",
            rank + 1,
            product.product_name,
            product.rating_count
        );
    }
    println!();
    println!("The best-selling products are:");
    for product in &report.podium {
        println!("  - {}", product.product_name);
    }
    println!();

    // Expensive vs cheap
    println!("EXPENSIVE VS CHEAP PRODUCTS");
    println!("{}", "-".repeat(40));
    println!("  Most expensive:");
    for product in &report.most_expensive {
        println!(
            "    {:<20} {:>10.2} {:>10.0} ratings",
            product.product_name, product.actual_price, product.rating_count
        );
    }
    println!("  Least expensive:");
    for product in &report.least_expensive {
        println!(
            "    {:<20} {:>10.2} {:>10.0} ratings",
            product.product_name, product.actual_price, product.rating_count
        );
    }
    let comparison = &report.price_comparison;
    if comparison.slice_size > 0 {
        println!(
            "  Average ratings: {:.0} for the {} most expensive, {:.0} for the {} least expensive",
            comparison.expensive_mean_rating_count,
            comparison.slice_size,
            comparison.cheap_mean_rating_count,
            comparison.slice_size
        );
        if comparison.cheap_sells_more() {
            println!("  Cheaper products collect more ratings than expensive ones.");
        } else {
            println!("  Expensive products collect at least as many ratings as cheap ones.");
        }
    }
    println!();

    // Categories
    println!("RATINGS PER CATEGORY");
    println!("{}", "-".repeat(40));
    for category in &report.category_totals {
        println!(
            "  {:<35} {:>12.0}",
            category.category, category.total_rating_count
        );
    }
    println!();
    if !report.top_categories.is_empty() {
        println!("Most voted categories:");
        for category in &report.top_categories {
            println!("  - {}", category.category);
        }
    }
    if let Some(least) = &report.least_voted_category {
        println!(
            "Least voted category: {} with only {:.0} votes",
            least.category, least.total_rating_count
        );
    }

    println!("{}", "=".repeat(80));
}

fn print_cleaning(summary: &CleaningSummary) {
    println!("DATA CLEANING");
    println!("{}", "-".repeat(40));
    println!(
        "  Columns: {} -> {} ({} dropped)",
        summary.columns_before,
        summary.columns_after,
        summary.dropped_columns.len()
    );
    for column in &summary.normalized_columns {
        println!(
            "  {}: numeric ({} unparseable cells)",
            column.column, column.unparseable_cells
        );
    }

    let missing_pct = summary.missing_fraction_before * 100.0;
    if summary.missing_fraction_before == 0.0 {
        println!("  No need for a missing-value correction. {:.2}% missing.", missing_pct);
    } else {
        println!(
            "  Needed missing-value cleaning: {:.2}% of cells missing, {:.2}% of rows incomplete.",
            missing_pct,
            summary.rows_with_missing_fraction_before * 100.0
        );
        match &summary.residual_warning {
            None => println!("  Cleaning done. No more missing data."),
            Some(warning) => println!("  Warning: {}", warning),
        }
    }
    println!(
        "  Rows: {} -> {} ({} removed, {:.1}%)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_dropped,
        summary.rows_dropped_percentage()
    );
    println!();
}
