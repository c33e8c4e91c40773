//! Conversion of raw text cells into numeric values.

use super::sanitizers::{remove_thousands_separators, strip_special_chars};
use anyhow::Result;
use polars::prelude::*;
use regex::Regex;

/// Parse one raw cell into a finite number.
///
/// Strips the symbols matched by `symbols`, removes thousands-separator
/// commas and trims whitespace, then requires the whole remainder to parse.
/// Anything else left over (`"4.2 out of 5 stars"`), an empty cell, or a
/// non-finite value (`NaN`, `inf`) gives `None`.
pub fn parse_amount(raw: &str, symbols: &Regex) -> Option<f64> {
    let stripped = strip_special_chars(raw, symbols);
    let cleaned = remove_thousands_separators(&stripped);
    let trimmed = cleaned.trim();

    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Convert a column of any type into `Float64` using [`parse_amount`].
///
/// The column is cast to text first. Returns the converted series and the
/// number of cells that held a value but failed to parse.
pub(crate) fn string_to_amount(series: &Series, symbols: &Regex) -> Result<(Series, usize)> {
    let text = series.cast(&DataType::String)?;
    let str_series = text.str()?;

    let mut unparseable = 0;
    let mut result_vec: Vec<Option<f64>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let parsed = parse_amount(val, symbols);
                if parsed.is_none() {
                    unparseable += 1;
                }
                result_vec.push(parsed);
            }
            None => result_vec.push(None),
        }
    }

    Ok((Series::new(series.name().clone(), result_vec), unparseable))
}
