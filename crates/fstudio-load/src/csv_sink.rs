//! Flat-file sink.

use std::path::Path;

use fstudio_core::{NormalizedProductRecord, COLUMNS};

use crate::error::LoadError;

/// Writes `rows` to `path` as CSV, replacing any existing file.
///
/// The header row is always written, so an empty table still produces a
/// file with the column names. Missing ratings and timestamps are empty
/// cells. Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if the file cannot be created or a row cannot
/// be serialized, and [`LoadError::Io`] if the final flush fails.
pub fn write_csv(path: &Path, rows: &[NormalizedProductRecord]) -> Result<usize, LoadError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}
