//! CSV reading for ingestion.
//!
//! Fixture CSVs quote embedded commas with single quotes
//! (`'221B Baker St,London NW1 6XE,UK'`), and cells may carry stray spaces
//! around separators, so every reader uses `'` as the quote character and
//! trims all fields.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Quote character used by every pipeline CSV.
pub const QUOTE: u8 = b'\'';

/// Read every data row of a headered CSV file into `T`.
///
/// # Errors
///
/// Returns `DatabaseError::Csv` if the file cannot be opened (the wrapped
/// I/O error is preserved) or a row does not match `T`.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatabaseError> {
    let mut reader = ReaderBuilder::new()
        .quote(QUOTE)
        .trim(Trim::All)
        .from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "read csv");
    Ok(rows)
}
