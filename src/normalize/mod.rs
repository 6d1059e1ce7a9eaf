// src/normalize/mod.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::RawTable;

// --- Regex Patterns (Lazy Static) ---
static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RUN_RE"));

// A run of exactly four digits, not embedded in a longer digit run.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{4})(?:[^0-9]|$)").expect("Failed to compile YEAR_RE")
});

// Serial-number rows start with a purely numeric cell.
static SERIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("Failed to compile SERIAL_RE"));

/// Name of the derived period column appended to every normalized table.
pub const YEAR_COLUMN: &str = "year";

// --- Data Structures ---
/// A table whose columns are canonical keys (plus trailing `year`) and whose
/// rows have passed the serial-number validity filter.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Canonicalizes a column name: trim, lowercase, collapse internal
/// whitespace runs to a single underscore. Idempotent.
pub fn canonical_key(name: &str) -> String {
    WHITESPACE_RUN_RE
        .replace_all(name.trim(), "_")
        .to_lowercase()
}

/// Extracts the first four-digit year from a source filename.
///
/// Absence is not an error; records from an undated file simply carry no
/// year value.
pub fn year_from_filename(file_name: &str) -> Option<String> {
    YEAR_RE
        .captures(file_name)
        .map(|caps| caps[1].to_string())
}

/// Keeps only rows whose first cell is a serial number (all digits).
///
/// This also discards header/footer/note lines accidentally captured as
/// data. A table with fewer than two columns cannot be reliably validated
/// and passes through unfiltered.
fn is_valid_row(row: &[String], column_count: usize) -> bool {
    if column_count < 2 {
        return true;
    }
    row.first().is_some_and(|cell| SERIAL_RE.is_match(cell))
}

/// Normalizes one raw table: canonical column keys, derived `year` column,
/// serial-number row filter. Order-sensitive.
pub fn normalize(table: &RawTable, source_file_name: &str) -> NormalizedTable {
    let column_count = table.column_count();

    let mut columns: Vec<String> = table.headers.iter().map(|h| canonical_key(h)).collect();
    columns.push(YEAR_COLUMN.to_string());

    // Records from a file without a derivable year carry an empty cell.
    let year = year_from_filename(source_file_name).unwrap_or_default();

    let rows = table
        .rows
        .iter()
        .filter(|row| is_valid_row(row, column_count))
        .map(|row| {
            // Defend against ragged grids from a permissive backend.
            let mut cells: Vec<String> = row.iter().take(column_count).cloned().collect();
            cells.resize(column_count, String::new());
            cells.push(year.clone());
            cells
        })
        .collect();

    NormalizedTable { columns, rows }
}
