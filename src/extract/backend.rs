// src/extract/backend.rs
use std::path::Path;

use lopdf::Document;

use crate::extract::table::{detect_tables, RawTable, StreamOptions};
use crate::utils::error::ExtractError;

/// Narrow seam over the table-detection backend, so normalization and
/// cleaning logic can be exercised with synthetic grids.
pub trait TableReader {
    /// Returns every table detected on the given pages, in page order.
    fn read_tables(&self, path: &Path, pages: &[u32]) -> Result<Vec<RawTable>, ExtractError>;
}

/// PDF-backed reader: extracts each requested page's text with lopdf and
/// runs stream-style detection over it.
///
/// Pages missing from the document are skipped rather than treated as
/// errors; some early reports are single-page.
#[derive(Debug, Default)]
pub struct StreamPdfReader {
    options: StreamOptions,
}

impl StreamPdfReader {
    pub fn new(options: StreamOptions) -> Self {
        Self { options }
    }
}

impl TableReader for StreamPdfReader {
    fn read_tables(&self, path: &Path, pages: &[u32]) -> Result<Vec<RawTable>, ExtractError> {
        let document = Document::load(path).map_err(|e| ExtractError::Backend {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let available = document.get_pages();

        let mut tables = Vec::new();
        for &page in pages {
            if !available.contains_key(&page) {
                continue;
            }
            let text = document
                .extract_text(&[page])
                .map_err(|e| ExtractError::Backend {
                    path: path.to_path_buf(),
                    reason: format!("page {}: {}", page, e),
                })?;
            tables.extend(detect_tables(&text, &self.options));
        }
        Ok(tables)
    }
}
