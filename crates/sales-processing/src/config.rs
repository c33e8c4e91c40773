//! Configuration for the sales cleaning pipeline.
//!
//! The cleaning rules are fixed for the Amazon sales snapshot; they live here
//! as defaults so tests and the CLI can override the source path and the
//! display limits without touching the cleaning code.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the sales snapshot, relative to the working directory.
pub const DEFAULT_SOURCE_PATH: &str = "data/amazon_sales.csv";

/// Columns that never take part in any computation.
pub const DEFAULT_DROPPED_COLUMNS: [&str; 10] = [
    "product_id",
    "discount_percentage",
    "user_id",
    "user_name",
    "review_id",
    "review_title",
    "review_content",
    "img_link",
    "product_link",
    "about_product",
];

/// Columns stored as text in the source that must become numbers.
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 4] =
    ["actual_price", "discounted_price", "rating", "rating_count"];

/// Special and currency symbols stripped before numeric parsing.
pub const DEFAULT_SPECIAL_CHARS: [char; 6] = ['@', '#', '$', '%', '₹', '€'];

/// How a label is shortened for display.
///
/// Labels of at most `threshold` characters are shown as-is; longer labels
/// are cut to `keep` characters and suffixed with `...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    pub threshold: usize,
    pub keep: usize,
}

impl LabelRule {
    pub const fn new(threshold: usize, keep: usize) -> Self {
        Self { threshold, keep }
    }
}

/// Sizes of the report slices and the label rules applied to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLimits {
    /// Number of most-voted products listed.
    pub top_voted: usize,
    /// Number of products/categories called out as the podium.
    pub podium: usize,
    /// Number of products in each of the most/least expensive slices.
    pub price_slice: usize,
    pub vote_label: LabelRule,
    pub price_label: LabelRule,
    pub category_label: LabelRule,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            top_voted: 50,
            podium: 3,
            price_slice: 20,
            vote_label: LabelRule::new(10, 50),
            price_label: LabelRule::new(10, 15),
            category_label: LabelRule::new(10, 30),
        }
    }
}

/// Configuration for the sales pipeline.
///
/// Use [`SalesConfig::builder()`] to override individual settings.
///
/// # Example
///
/// ```rust,ignore
/// use sales_processing::config::SalesConfig;
///
/// let config = SalesConfig::builder()
///     .source_path("data/amazon_sales.csv")
///     .top_voted(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesConfig {
    /// Path of the CSV snapshot.
    /// Default: "data/amazon_sales.csv"
    pub source_path: PathBuf,

    /// Columns removed before cleaning. Absent columns are ignored.
    pub dropped_columns: Vec<String>,

    /// Columns normalised from raw text to `Float64`.
    pub numeric_columns: Vec<String>,

    /// Symbols stripped from numeric columns before parsing.
    pub special_chars: Vec<char>,

    /// Report slice sizes and label truncation rules.
    pub display: DisplayLimits,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            dropped_columns: DEFAULT_DROPPED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            numeric_columns: DEFAULT_NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect(),
            special_chars: DEFAULT_SPECIAL_CHARS.to_vec(),
            display: DisplayLimits::default(),
        }
    }
}

impl SalesConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SalesConfigBuilder {
        SalesConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.numeric_columns.is_empty() {
            return Err(ConfigValidationError::NoNumericColumns);
        }

        if let Some(column) = self
            .numeric_columns
            .iter()
            .find(|col| self.dropped_columns.contains(col))
        {
            return Err(ConfigValidationError::ConflictingColumn(column.clone()));
        }

        for (field, value) in [
            ("top_voted", self.display.top_voted),
            ("podium", self.display.podium),
            ("price_slice", self.display.price_slice),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::InvalidLimit {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, rule) in [
            ("vote_label", self.display.vote_label),
            ("price_label", self.display.price_label),
            ("category_label", self.display.category_label),
        ] {
            if rule.keep == 0 {
                return Err(ConfigValidationError::InvalidLabelRule(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("At least one numeric column must be configured")]
    NoNumericColumns,

    #[error("Column '{0}' is both dropped and normalised")]
    ConflictingColumn(String),

    #[error("Invalid display limit for '{field}': {value} (must be at least 1)")]
    InvalidLimit { field: String, value: usize },

    #[error("Label rule '{0}' must keep at least one character")]
    InvalidLabelRule(String),
}

impl From<ConfigValidationError> for crate::error::SalesError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::SalesError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`SalesConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SalesConfigBuilder {
    source_path: Option<PathBuf>,
    dropped_columns: Option<Vec<String>>,
    numeric_columns: Option<Vec<String>>,
    special_chars: Option<Vec<char>>,
    top_voted: Option<usize>,
    podium: Option<usize>,
    price_slice: Option<usize>,
    vote_label: Option<LabelRule>,
    price_label: Option<LabelRule>,
    category_label: Option<LabelRule>,
}

impl SalesConfigBuilder {
    /// Set the CSV source path.
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Replace the list of columns dropped before cleaning.
    pub fn dropped_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dropped_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of columns normalised to numbers.
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the stripped symbol set.
    pub fn special_chars(mut self, chars: impl Into<Vec<char>>) -> Self {
        self.special_chars = Some(chars.into());
        self
    }

    /// Number of most-voted products listed in the report.
    pub fn top_voted(mut self, n: usize) -> Self {
        self.top_voted = Some(n);
        self
    }

    /// Number of entries called out as the podium.
    pub fn podium(mut self, n: usize) -> Self {
        self.podium = Some(n);
        self
    }

    /// Size of the most/least expensive slices.
    pub fn price_slice(mut self, n: usize) -> Self {
        self.price_slice = Some(n);
        self
    }

    pub fn vote_label(mut self, rule: LabelRule) -> Self {
        self.vote_label = Some(rule);
        self
    }

    pub fn price_label(mut self, rule: LabelRule) -> Self {
        self.price_label = Some(rule);
        self
    }

    pub fn category_label(mut self, rule: LabelRule) -> Self {
        self.category_label = Some(rule);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `SalesConfig` or an error if validation fails.
    pub fn build(self) -> Result<SalesConfig, ConfigValidationError> {
        let defaults = SalesConfig::default();
        let display = DisplayLimits {
            top_voted: self.top_voted.unwrap_or(defaults.display.top_voted),
            podium: self.podium.unwrap_or(defaults.display.podium),
            price_slice: self.price_slice.unwrap_or(defaults.display.price_slice),
            vote_label: self.vote_label.unwrap_or(defaults.display.vote_label),
            price_label: self.price_label.unwrap_or(defaults.display.price_label),
            category_label: self
                .category_label
                .unwrap_or(defaults.display.category_label),
        };

        let config = SalesConfig {
            source_path: self.source_path.unwrap_or(defaults.source_path),
            dropped_columns: self.dropped_columns.unwrap_or(defaults.dropped_columns),
            numeric_columns: self.numeric_columns.unwrap_or(defaults.numeric_columns),
            special_chars: self.special_chars.unwrap_or(defaults.special_chars),
            display,
        };

        config.validate()?;
        Ok(config)
    }
}
