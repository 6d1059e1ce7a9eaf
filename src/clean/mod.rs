// src/clean/mod.rs

// --- Imports ---
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::normalize::YEAR_COLUMN;
use crate::storage::StorageManager;
use crate::utils::error::CleanError;

// --- Constants ---
/// Fraction of a row's cells that may be missing before the proportional
/// filter drops it.
pub const ROW_GAP_THRESHOLD: f64 = 0.5;

/// Rows may carry at most this many missing values, independent of the
/// proportional threshold.
const MAX_MISSING_PER_ROW: usize = 2;

/// The leading row-index column, dropped from final output.
pub const SERIAL_COLUMN: &str = "Sl. No.";

/// Final schema for the state-level dataset.
pub const STATE_COLUMNS: [&str; 8] = [
    "Sl. No.",
    "State/UT",
    "Number of Suicides",
    "Percentage Share in Total Suicides",
    "Estimated Mid–Year Population (in Lakh)",
    "Rate of Suicides (Col.3/Col.5)",
    "Rank for State/UT",
    "Year",
];

/// Final schema for the city-level dataset.
pub const CITY_COLUMNS: [&str; 8] = [
    "Sl. No.",
    "Cities",
    "Number of Suicides",
    "Percentage Share in Total Suicides",
    "Estimated Mid–Year Population (in Lakh)",
    "Rate of Suicides (Col.3/Col.5)",
    "Rank for Cities",
    "Year",
];

// --- Data Structures ---
/// In-memory view of an intermediate file. `None` marks a missing value
/// (an empty CSV field).
struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// Cleans one intermediate file into its final artifact.
///
/// The pipeline is strictly linear with no retries: load, drop degenerate
/// columns, truncate after the year column, apply the row filters,
/// reconcile the column count against the expected schema (fail-closed:
/// a mismatch rejects the whole file, nothing partial is written), rename
/// positionally, drop the serial-number column, write the artifact and
/// delete the intermediate.
pub fn clean_csv(
    storage: &StorageManager,
    path: &Path,
    expected_columns: &[&str],
    threshold: f64,
) -> Result<PathBuf, CleanError> {
    if !path.exists() {
        return Err(CleanError::NotFound(path.to_path_buf()));
    }

    info!("Reading file: {}", path.display());
    let mut table = load(path)?;
    if table.rows.is_empty() {
        return Err(CleanError::Empty(path.to_path_buf()));
    }

    drop_degenerate_columns(&mut table);
    truncate_after_year(&mut table);
    apply_row_filters(&mut table, threshold);

    if table.columns.len() != expected_columns.len() {
        return Err(CleanError::SchemaMismatch {
            path: path.to_path_buf(),
            found: table.columns.len(),
            expected: expected_columns.len(),
        });
    }
    table.columns = expected_columns.iter().map(|c| c.to_string()).collect();

    drop_serial_column(&mut table);

    if table.rows.is_empty() {
        return Err(CleanError::Empty(path.to_path_buf()));
    }

    let cleaned = storage.write_cleaned(path, &table.columns, &table.rows)?;

    // The final artifact replaces the intermediate; no dual copies.
    fs::remove_file(path)?;
    info!("Deleted original file: {}", path.display());

    Ok(cleaned)
}

fn load(path: &Path) -> Result<Table, CleanError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut cells: Vec<Option<String>> = record
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        cells.resize(columns.len(), None);
        rows.push(cells);
    }

    Ok(Table { columns, rows })
}

/// Drops columns that are entirely missing or entirely empty-string.
fn drop_degenerate_columns(table: &mut Table) {
    let keep: Vec<bool> = (0..table.columns.len())
        .map(|i| {
            table.rows.iter().any(|row| {
                row.get(i)
                    .and_then(|cell| cell.as_deref())
                    .is_some_and(|s| !s.is_empty())
            })
        })
        .collect();

    if keep.iter().all(|k| *k) {
        return;
    }

    table.columns = table
        .columns
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(c, _)| c.clone())
        .collect();
    for row in &mut table.rows {
        let mut i = 0;
        row.retain(|_| {
            let kept = keep[i];
            i += 1;
            kept
        });
    }
}

/// Removes any columns trailing the derived year column; source tables are
/// structurally stable, so anything after it is extraction noise.
fn truncate_after_year(table: &mut Table) {
    if let Some(idx) = table.columns.iter().position(|c| c == YEAR_COLUMN) {
        table.columns.truncate(idx + 1);
        for row in &mut table.rows {
            row.truncate(idx + 1);
        }
    }
}

fn missing_count(row: &[Option<String>]) -> usize {
    row.iter().filter(|cell| cell.is_none()).count()
}

/// Applies the row filters in order: the proportional missing-value
/// threshold, the hard cap, and the all-empty-string guard. The filters
/// overlap in effect but are kept independent.
fn apply_row_filters(table: &mut Table, threshold: f64) {
    let column_count = table.columns.len();
    let max_missing = (column_count as f64 * threshold).floor() as usize;

    table.rows.retain(|row| missing_count(row) <= max_missing);
    table
        .rows
        .retain(|row| missing_count(row) <= MAX_MISSING_PER_ROW);
    table
        .rows
        .retain(|row| !row.iter().all(|cell| matches!(cell.as_deref(), Some(""))));
}

/// If a serial-number column is present by name, drops it.
fn drop_serial_column(table: &mut Table) {
    if let Some(idx) = table.columns.iter().position(|c| c == SERIAL_COLUMN) {
        table.columns.remove(idx);
        for row in &mut table.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    use crate::aggregate::aggregate;
    use crate::extract::{RawTable, TableReader};
    use crate::select::find_candidates;
    use crate::storage::{CITY_DATA_FILE, STATE_DATA_FILE};
    use crate::utils::error::ExtractError;

    const INTERMEDIATE_HEADER: &str = "0,1,2,3,4,5,6,year";

    fn full_row(serial: u32, name: &str, year: &str) -> String {
        format!("{},{},6465,4.7,531.9,12.2,18,{}", serial, name, year)
    }

    fn setup(contents: &str) -> (tempfile::TempDir, StorageManager, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let path = storage.intermediate_path(STATE_DATA_FILE);
        fs::write(&path, contents).unwrap();
        (dir, storage, path)
    }

    #[test]
    fn test_clean_happy_path_renames_and_drops_serial_column() {
        let contents = format!(
            "{}\n{}\n{}\n",
            INTERMEDIATE_HEADER,
            full_row(1, "Andhra Pradesh", "2020"),
            full_row(2, "Bihar", "2020"),
        );
        let (_dir, storage, path) = setup(&contents);

        let cleaned = clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD).unwrap();

        assert!(!path.exists(), "intermediate must be deleted");
        let output = fs::read_to_string(&cleaned).unwrap();
        let mut lines = output.lines();
        let header = lines.next().unwrap();
        assert!(!header.contains("Sl. No."));
        assert!(header.starts_with("State/UT,Number of Suicides"));
        assert!(header.ends_with("Year"));
        assert_eq!(lines.next().unwrap().split(',').count(), 7);
    }

    #[test]
    fn test_schema_gate_rejects_extra_columns() {
        let contents = format!(
            "{}\n{}\n",
            "0,1,2,3,4,5,6,7,year",
            "1,Andhra Pradesh,6465,4.7,531.9,12.2,18,x,2020",
        );
        let (_dir, storage, path) = setup(&contents);

        let result = clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD);
        assert!(matches!(
            result,
            Err(CleanError::SchemaMismatch {
                found: 9,
                expected: 8,
                ..
            })
        ));
        // Fail-closed: nothing partial is written, the intermediate stays.
        assert!(path.exists());
    }

    #[test]
    fn test_missing_intermediate_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let path = storage.intermediate_path(CITY_DATA_FILE);
        assert!(matches!(
            clean_csv(&storage, &path, &CITY_COLUMNS, ROW_GAP_THRESHOLD),
            Err(CleanError::NotFound(_))
        ));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let (_dir, storage, path) = setup(&format!("{}\n", INTERMEDIATE_HEADER));
        assert!(matches!(
            clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD),
            Err(CleanError::Empty(_))
        ));
    }

    #[test]
    fn test_hard_cap_binds_before_proportional_threshold() {
        // Eight columns allow up to four missing proportionally, but the
        // hard cap drops anything with more than two.
        let contents = format!(
            "{}\n{}\n{}\n{}\n",
            INTERMEDIATE_HEADER,
            full_row(1, "Kerala", "2020"),
            "2,Punjab,,,531.9,12.2,18,2020",  // two missing: kept
            "3,Odisha,,,,12.2,18,2020",       // three missing: dropped
        );
        let (_dir, storage, path) = setup(&contents);

        let cleaned = clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD).unwrap();
        let output = fs::read_to_string(&cleaned).unwrap();
        assert_eq!(output.lines().count(), 3); // header + two surviving rows
        assert!(output.contains("Punjab"));
        assert!(!output.contains("Odisha"));
    }

    #[test]
    fn test_degenerate_column_is_dropped_before_the_gate() {
        // Nine physical columns, one entirely empty: the gate sees eight.
        let contents = format!(
            "{}\n{}\n{}\n",
            "0,1,2,3,4,5,6,junk,year",
            "1,Kerala,6465,4.7,531.9,12.2,18,,2020",
            "2,Punjab,3000,2.1,277.0,10.8,21,,2020",
        );
        let (_dir, storage, path) = setup(&contents);

        let cleaned = clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD).unwrap();
        let output = fs::read_to_string(&cleaned).unwrap();
        assert!(output.lines().next().unwrap().ends_with("Year"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_columns_after_year_are_truncated() {
        // A populated trailing column after `year` is extraction noise.
        let contents = format!(
            "{}\n{}\n{}\n",
            "0,1,2,3,4,5,6,year,7",
            "1,Kerala,6465,4.7,531.9,12.2,18,2020,stray",
            "2,Punjab,3000,2.1,277.0,10.8,21,2020,stray",
        );
        let (_dir, storage, path) = setup(&contents);

        let cleaned = clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD).unwrap();
        let output = fs::read_to_string(&cleaned).unwrap();
        assert!(!output.contains("stray"));
        assert!(output.lines().next().unwrap().ends_with("Year"));
    }

    #[test]
    fn test_cleaning_is_idempotent_on_recreated_input() {
        let contents = format!(
            "{}\n{}\n",
            INTERMEDIATE_HEADER,
            full_row(1, "Kerala", "2020"),
        );

        let (_dir, storage, path) = setup(&contents);
        let first = clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD).unwrap();
        let first_bytes = fs::read(&first).unwrap();

        fs::write(&path, &contents).unwrap();
        let second = clean_csv(&storage, &path, &STATE_COLUMNS, ROW_GAP_THRESHOLD).unwrap();
        let second_bytes = fs::read(&second).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
    }

    /// End-to-end: a candidate report under a suicide-keyword folder yields
    /// state and city rows tagged with the filename year, and cleaning
    /// produces final artifacts without the serial-number column.
    #[test]
    fn test_pipeline_end_to_end() {
        struct TwoTableReader;

        impl TableReader for TwoTableReader {
            fn read_tables(
                &self,
                _path: &std::path::Path,
                _pages: &[u32],
            ) -> Result<Vec<RawTable>, ExtractError> {
                let headers: Vec<String> = (0..7).map(|i| i.to_string()).collect();
                let header_text = vec![
                    "Sl. No.".to_string(),
                    "State/UT".to_string(),
                    "Number of Suicides".to_string(),
                    "Percentage Share".to_string(),
                    "Population".to_string(),
                    "Rate".to_string(),
                    "Rank".to_string(),
                ];
                let state = RawTable {
                    headers: headers.clone(),
                    rows: vec![
                        header_text.clone(),
                        to_cells(&["1", "Andhra Pradesh", "6465", "4.7", "531.9", "12.2", "18"]),
                    ],
                };
                let city = RawTable {
                    headers,
                    rows: vec![
                        header_text,
                        to_cells(&["1", "Chennai", "2430", "10.9", "110.2", "22.0", "3"]),
                    ],
                };
                Ok(vec![state, city])
            }
        }

        fn to_cells(cells: &[&str]) -> Vec<String> {
            cells.iter().map(|s| s.to_string()).collect()
        }

        let dir = tempfile::tempdir().unwrap();
        let pdf_dir = dir.path().join("Suicide_Reports").join("2020");
        fs::create_dir_all(&pdf_dir).unwrap();
        fs::write(
            pdf_dir.join("Incidence_and_Rate_of_Suicides_State_UT_City_wise_2020.pdf"),
            b"%PDF-1.4",
        )
        .unwrap();

        let candidates = find_candidates(dir.path()).unwrap();
        assert_eq!(candidates.len(), 1);

        let (state, city) = aggregate(&TwoTableReader, &candidates);
        assert_eq!(state.rows().len(), 1);
        assert_eq!(city.rows().len(), 1);

        let storage = StorageManager::new(dir.path()).unwrap();
        let state_path = storage.write_dataset(&state, STATE_DATA_FILE).unwrap();
        let city_path = storage.write_dataset(&city, CITY_DATA_FILE).unwrap();

        let cleaned_state =
            clean_csv(&storage, &state_path, &STATE_COLUMNS, ROW_GAP_THRESHOLD).unwrap();
        let cleaned_city =
            clean_csv(&storage, &city_path, &CITY_COLUMNS, ROW_GAP_THRESHOLD).unwrap();

        let state_out = fs::read_to_string(&cleaned_state).unwrap();
        assert!(state_out.lines().next().unwrap().starts_with("State/UT"));
        assert!(state_out.contains("Andhra Pradesh"));
        assert!(state_out.lines().nth(1).unwrap().ends_with("2020"));

        let city_out = fs::read_to_string(&cleaned_city).unwrap();
        assert!(city_out.lines().next().unwrap().starts_with("Cities"));
        assert!(city_out.contains("Chennai"));
        assert!(!city_out.contains("Sl. No."));
    }
}
