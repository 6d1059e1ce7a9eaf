// src/extract/mod.rs
pub mod backend;
pub mod table;

// Re-export key extraction types for convenience
pub use backend::{StreamPdfReader, TableReader};
pub use table::{RawTable, StreamOptions};

use std::path::Path;

use crate::utils::error::ExtractError;

/// The state table always precedes the city table on the report's early
/// pages, so extraction is bounded to the first two.
pub const TABLE_PAGES: &[u32] = &[1, 2];

/// Extracts the state-level and city-level tables from one report.
///
/// The first detected table is treated as state-level, the second as
/// city-level; either may be absent. A document with no detectable tables
/// is logged and skipped, not an error.
pub fn extract_report_tables<R: TableReader + ?Sized>(
    reader: &R,
    path: &Path,
) -> Result<(Option<RawTable>, Option<RawTable>), ExtractError> {
    let tables = reader.read_tables(path, TABLE_PAGES)?;
    if tables.is_empty() {
        tracing::warn!("No tables found in {}", path.display());
        return Ok((None, None));
    }
    let mut tables = tables.into_iter();
    let state = tables.next();
    let city = tables.next();
    Ok((state, city))
}
