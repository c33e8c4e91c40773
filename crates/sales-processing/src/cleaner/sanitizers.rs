//! Text sanitization applied to numeric-bearing cells before parsing.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// The default symbol class: `@ # $ % ₹ €`.
pub static SPECIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[@#$%₹€]").expect("Invalid regex: special chars"));

/// Build a pattern matching any one of `symbols`.
///
/// An empty set yields a pattern that never matches.
pub fn symbol_pattern(symbols: &[char]) -> Result<Regex> {
    if symbols.is_empty() {
        return Ok(Regex::new(r"[^\s\S]")?);
    }
    let class: String = symbols
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    Ok(Regex::new(&format!("[{}]", class))?)
}

/// Remove every symbol matched by `pattern`.
pub fn strip_special_chars<'a>(raw: &'a str, pattern: &Regex) -> Cow<'a, str> {
    pattern.replace_all(raw, "")
}

/// Remove thousands-separator commas (`1,299` -> `1299`).
pub fn remove_thousands_separators(value: &str) -> String {
    value.replace(',', "")
}
