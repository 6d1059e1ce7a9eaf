// src/aggregate/mod.rs

// --- Imports ---
use std::collections::HashMap;

use tracing::{error, info};

use crate::extract::{extract_report_tables, TableReader};
use crate::normalize::{normalize, NormalizedTable};
use crate::select::CandidateDocument;

// --- Data Structures ---
/// An append-only accumulation of normalized rows for one table category
/// (state-level or city-level) across every candidate document.
///
/// Columns are the first-seen-order union of the appended tables' columns;
/// cells a table did not provide are missing (`None`).
#[derive(Debug, Default)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends one normalized table, unioning its columns into the dataset
    /// in first-seen order.
    pub fn append(&mut self, table: &NormalizedTable) {
        for column in &table.columns {
            if !self.index.contains_key(column) {
                self.index.insert(column.clone(), self.columns.len());
                self.columns.push(column.clone());
                for row in &mut self.rows {
                    row.push(None);
                }
            }
        }

        for row in &table.rows {
            let mut cells: Vec<Option<String>> = vec![None; self.columns.len()];
            for (i, column) in table.columns.iter().enumerate() {
                if let Some(cell) = row.get(i) {
                    cells[self.index[column]] = Some(cell.clone());
                }
            }
            self.rows.push(cells);
        }
    }
}

/// Runs extraction and normalization over every candidate document,
/// accumulating state-level and city-level records in selector order.
///
/// A backend failure for a single document is logged and the run continues;
/// only the caller's directory walk is allowed to be fatal.
pub fn aggregate<R: TableReader>(
    reader: &R,
    candidates: &[CandidateDocument],
) -> (Dataset, Dataset) {
    let mut state_data = Dataset::new();
    let mut city_data = Dataset::new();

    for document in candidates {
        let (state, city) = match extract_report_tables(reader, &document.path) {
            Ok(tables) => tables,
            Err(e) => {
                error!("Skipping {}: {}", document.path.display(), e);
                continue;
            }
        };

        if let Some(table) = state {
            let normalized = normalize(&table, &document.file_name);
            if !normalized.is_empty() {
                state_data.append(&normalized);
            }
        }
        if let Some(table) = city {
            let normalized = normalize(&table, &document.file_name);
            if !normalized.is_empty() {
                city_data.append(&normalized);
            }
        }

        info!("Processed: {}", document.path.display());
    }

    (state_data, city_data)
}
