// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::Dataset;
use crate::utils::error::StorageError;

/// Intermediate accumulation file for state-level records.
pub const STATE_DATA_FILE: &str = "state_data.csv";
/// Intermediate accumulation file for city-level records.
pub const CITY_DATA_FILE: &str = "city_data.csv";
/// Directory receiving finished artifacts.
pub const CLEANED_DIR: &str = "cleaned_data";
/// Prefix applied to finished artifacts.
pub const CLEANED_PREFIX: &str = "cleaned_";

pub struct StorageManager {
    work_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager rooted at the specified directory
    /// (the working directory for a normal run).
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Result<Self, StorageError> {
        let work_dir = work_dir.as_ref().to_path_buf();

        if !work_dir.exists() {
            fs::create_dir_all(&work_dir).map_err(StorageError::IoError)?;
        }

        Ok(Self { work_dir })
    }

    /// Location of an intermediate accumulation file.
    pub fn intermediate_path(&self, file_name: &str) -> PathBuf {
        self.work_dir.join(file_name)
    }

    /// Persists an accumulated dataset as an intermediate CSV file.
    /// Missing cells become empty fields.
    pub fn write_dataset(
        &self,
        dataset: &Dataset,
        file_name: &str,
    ) -> Result<PathBuf, StorageError> {
        let path = self.intermediate_path(file_name);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(dataset.columns())?;
        for row in dataset.rows() {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;

        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }

    /// Writes a cleaned table under the cleaned-data directory with the
    /// `cleaned_` prefix, plus a JSON sidecar describing the artifact.
    pub fn write_cleaned(
        &self,
        source: &Path,
        columns: &[String],
        rows: &[Vec<Option<String>>],
    ) -> Result<PathBuf, StorageError> {
        let cleaned_dir = self.work_dir.join(CLEANED_DIR);
        if !cleaned_dir.exists() {
            fs::create_dir_all(&cleaned_dir).map_err(StorageError::IoError)?;
        }

        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "data.csv".to_string());
        let file_path = cleaned_dir.join(format!("{}{}", CLEANED_PREFIX, source_name));

        let mut writer = csv::Writer::from_path(&file_path)?;
        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;

        self.write_cleaned_metadata(&file_path, &source_name, columns, rows.len())?;

        tracing::info!("Saved cleaned file: {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about a cleaned artifact in JSON format.
    fn write_cleaned_metadata(
        &self,
        cleaned_path: &Path,
        source_name: &str,
        columns: &[String],
        row_count: usize,
    ) -> Result<(), StorageError> {
        let stem = cleaned_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "cleaned".to_string());
        let meta_path = cleaned_path.with_file_name(format!("{}_meta.json", stem));

        let metadata = serde_json::json!({
            "source_file": source_name,
            "columns": columns,
            "row_count": row_count,
            "cleaned_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&meta_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::debug!("Saved metadata to {}", meta_path.display());
        Ok(())
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedTable;

    #[test]
    fn test_write_dataset_round_trips_missing_cells_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();

        let mut dataset = Dataset::new();
        dataset.append(&NormalizedTable {
            columns: vec!["0".into(), "1".into(), "year".into()],
            rows: vec![vec!["1".into(), "Goa".into(), "2020".into()]],
        });
        dataset.append(&NormalizedTable {
            columns: vec!["0".into(), "1".into(), "2".into(), "year".into()],
            rows: vec![vec!["2".into(), "Kerala".into(), "9.1".into(), "2021".into()]],
        });

        let path = storage.write_dataset(&dataset, STATE_DATA_FILE).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("0,1,year,2"));
        assert_eq!(lines.next(), Some("1,Goa,2020,"));
        assert_eq!(lines.next(), Some("2,Kerala,2021,9.1"));
    }

    #[test]
    fn test_write_cleaned_prefixes_and_writes_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();

        let columns = vec!["State/UT".to_string(), "Year".to_string()];
        let rows = vec![vec![Some("Goa".to_string()), Some("2020".to_string())]];
        let path = storage
            .write_cleaned(Path::new("state_data.csv"), &columns, &rows)
            .unwrap();

        assert!(path.ends_with("cleaned_data/cleaned_state_data.csv"));
        assert!(path.exists());
        assert!(path
            .with_file_name("cleaned_state_data_meta.json")
            .exists());
    }
}
