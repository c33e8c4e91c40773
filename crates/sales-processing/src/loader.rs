//! CSV loading for the sales snapshot.
//!
//! Every column is read as text: the cleaning stages decide what becomes a
//! number. Empty fields load as nulls.

use crate::error::{Result, SalesError};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Load the CSV at `path`.
///
/// A missing file is [`SalesError::SourceNotFound`]; a file the CSV reader
/// rejects is [`SalesError::SourceUnreadable`]. Both abort the run: the
/// content is never rewritten and parsed again.
pub fn load_sales_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SalesError::SourceNotFound(path.to_path_buf()));
    }

    info!("Loading sales data from: {}", path.display());

    let unreadable = |e: PolarsError| SalesError::SourceUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let df = text_csv_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(unreadable)?
        .finish()
        .map_err(unreadable)?;

    debug!("Loaded {:?}", df.shape());
    Ok(df)
}

/// Parse CSV text already held in memory, every column as text.
pub fn read_csv_str(content: &str) -> Result<DataFrame> {
    let cursor = Cursor::new(content.to_string());
    let df = text_csv_options()
        .into_reader_with_file_handle(cursor)
        .finish()?;
    Ok(df)
}

/// Header row, `"` quoting, schema inference disabled so every column is `String`.
fn text_csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
}
