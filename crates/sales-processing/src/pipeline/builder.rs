//! The cleaning pipeline and its builder.

use crate::cleaner::SalesCleaner;
use crate::config::SalesConfig;
use crate::error::{Result, SalesError};
use crate::loader::load_sales_csv;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::quality::DataQualityAnalyzer;
use crate::types::{CleanedTable, CleaningOutcome, CleaningSummary};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Single-pass cleaning of a sales snapshot.
///
/// The table moves through the stages by value: each stage consumes the
/// previous table and returns the next one.
///
/// # Example
///
/// ```rust,ignore
/// use sales_processing::{Pipeline, SalesConfig};
///
/// let outcome = Pipeline::builder()
///     .config(SalesConfig::default())
///     .build()?
///     .load_and_clean("data/amazon_sales.csv")?;
///
/// println!("{} clean rows", outcome.table.height());
/// ```
pub struct Pipeline {
    config: SalesConfig,
    cleaner: SalesCleaner,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &SalesConfig {
        &self.config
    }

    /// Load the configured source and clean it.
    pub fn run(&self) -> Result<CleaningOutcome> {
        self.load_and_clean(&self.config.source_path)
    }

    /// Load the CSV at `source` and clean it.
    ///
    /// # Errors
    ///
    /// A missing or unreadable source aborts the run.
    pub fn load_and_clean(&self, source: impl AsRef<Path>) -> Result<CleaningOutcome> {
        let start_time = Instant::now();

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            format!("Reading {}", source.as_ref().display()),
        ));

        let df = match load_sales_csv(source) {
            Ok(df) => df,
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Could not load sales data: {}", e);
                return Err(e);
            }
        };

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            1.0,
            format!("Loaded {} rows x {} columns", df.height(), df.width()),
        ));

        let mut outcome = self.process(df)?;
        outcome.summary.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(outcome)
    }

    /// Clean an already loaded table.
    pub fn process(&self, df: DataFrame) -> Result<CleaningOutcome> {
        match self.process_internal(df) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaning complete: {} rows kept",
                    outcome.table.height()
                )));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, df: DataFrame) -> Result<CleaningOutcome> {
        let start_time = Instant::now();
        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();
        summary.columns_before = df.width();

        // Step 1: prune columns
        self.report_progress(ProgressUpdate::new(
            PipelineStage::PruningColumns,
            0.0,
            "Dropping unused columns...",
        ));
        info!("Step 1: Dropping unused columns...");

        let (df, dropped) = self.cleaner.drop_unused_columns(df);
        if dropped.is_empty() {
            summary.add_action("No unused columns found");
        } else {
            summary.add_action(format!(
                "Dropped {} unused columns: {:?}",
                dropped.len(),
                dropped
            ));
        }
        summary.dropped_columns = dropped;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::PruningColumns,
            1.0,
            format!("{} columns kept", df.width()),
        ));

        // Step 2: normalise numeric columns
        self.report_progress(ProgressUpdate::new(
            PipelineStage::NormalizingNumbers,
            0.0,
            "Normalizing price and rating columns...",
        ));
        info!("Step 2: Normalizing numeric columns...");

        let (df, normalized) = self
            .cleaner
            .normalize_numeric_columns(df)
            .map_err(|e| SalesError::CleaningFailed(e.to_string()))?;

        for col in &normalized {
            debug!(
                "  {}: Float64 ({} unparseable)",
                col.column, col.unparseable_cells
            );
        }
        summary.add_action(format!(
            "Converted {} columns to numeric, {} cells could not be parsed",
            normalized.len(),
            normalized.iter().map(|c| c.unparseable_cells).sum::<usize>()
        ));
        summary.normalized_columns = normalized;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::NormalizingNumbers,
            1.0,
            "Numeric normalization complete",
        ));

        // Step 3: missing values
        self.report_progress(ProgressUpdate::new(
            PipelineStage::DroppingMissing,
            0.0,
            "Checking missing values...",
        ));
        info!("Step 3: Checking missing values...");

        summary.missing_fraction_before = DataQualityAnalyzer::missing_fraction(&df);
        summary.rows_with_missing_fraction_before =
            DataQualityAnalyzer::rows_with_missing_fraction(&df)?;

        let df = if summary.missing_fraction_before == 0.0 {
            info!(
                "No need for a missing-value correction ({:.2}% missing)",
                summary.missing_fraction_before * 100.0
            );
            summary.add_action("No missing values found");
            df
        } else {
            info!(
                "Dropping incomplete rows ({:.2}% of cells missing)",
                summary.missing_fraction_before * 100.0
            );
            let (df, removed) = self
                .cleaner
                .drop_missing_rows(df)
                .map_err(|e| SalesError::CleaningFailed(e.to_string()))?;
            summary.rows_dropped = removed;
            summary.add_action(format!(
                "Removed {} rows with missing values ({:.2}% of cells were missing)",
                removed,
                summary.missing_fraction_before * 100.0
            ));
            df
        };

        summary.missing_fraction_after = DataQualityAnalyzer::missing_fraction(&df);
        summary.residual_warning = DataQualityAnalyzer::residual_warning(&df);
        if let Some(warning) = &summary.residual_warning {
            warn!("{}", warning);
        }

        self.report_progress(ProgressUpdate::new(
            PipelineStage::DroppingMissing,
            1.0,
            format!("{} rows kept", df.height()),
        ));

        summary.rows_after = df.height();
        summary.columns_after = df.width();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Cleaned table: {} rows x {} columns ({} rows dropped)",
            summary.rows_after, summary.columns_after, summary.rows_dropped
        );

        Ok(CleaningOutcome {
            table: CleanedTable::new(df),
            summary,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<SalesConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`SalesConfig::default`].
    pub fn config(mut self, config: SalesConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Report progress through a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let cleaner =
            SalesCleaner::new(&config).map_err(|e| SalesError::InvalidConfig(e.to_string()))?;

        Ok(Pipeline {
            config,
            cleaner,
            progress_reporter: self.progress_reporter,
        })
    }
}
