// src/ncrb/models.rs
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Category headings read like "Chapter 2 -- Suicides in India"; the folder
// name is the text after the double dash.
static FOLDER_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--\s*(.+)").expect("Failed to compile FOLDER_SUFFIX_RE"));

// Leading numbering like "2.3_" or "A1._" on document titles.
static LEADING_NUMBERING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Z\.]+_").expect("Failed to compile LEADING_NUMBERING_RE"));

static INVALID_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9 \-_]").expect("Failed to compile INVALID_CHARS_RE"));

/// One downloadable report PDF discovered on a year's table-of-contents page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfLink {
    pub url: String,
    pub file_name: String,
    pub category: String,
    pub year: u32,
}

impl PdfLink {
    /// Where this PDF lands in the downloaded tree.
    pub fn target_path(&self, out_root: &Path) -> PathBuf {
        out_root
            .join(self.year.to_string())
            .join(&self.category)
            .join(&self.file_name)
    }
}

/// Formats a category heading into a folder name by extracting the text
/// after `--` and replacing spaces with underscores.
pub fn format_folder_name(heading: &str) -> String {
    let name = FOLDER_SUFFIX_RE
        .captures(heading)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| heading.to_string());
    name.replace(' ', "_")
}

/// Cleans a document title into a PDF filename by removing leading
/// numbering and invalid characters.
pub fn clean_file_name(title: &str) -> String {
    let stripped = LEADING_NUMBERING_RE.replace(title, "");
    let cleaned = INVALID_CHARS_RE.replace_all(&stripped, "");
    cleaned.trim().replace(' ', "_")
}
