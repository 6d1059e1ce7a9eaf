// src/select/mod.rs

// --- Imports ---
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// --- Constants ---
// Folder name keywords: a directory is worth descending into if any path
// segment contains one of these.
const FOLDER_KEYWORDS: &[&str] = &[
    "suicides",
    "suicides in india",
    "suicide data",
    "suicide report",
];

// Keywords that must all appear in a report PDF filename.
const REQUIRED_TERMS: &[&str] = &["incidence", "rate", "state", "suicides", "city", "wise"];

// --- Data Structures ---
/// A file selected by heuristic as likely containing the target tables.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    /// Absolute (or walk-relative) path of the PDF.
    pub path: PathBuf,
    /// The directory containing the PDF.
    pub folder: PathBuf,
    /// The bare filename, used later for year derivation.
    pub file_name: String,
}

/// Checks if any part of the folder path contains a relevant keyword
/// (ignoring case, underscores treated as spaces).
pub fn is_relevant_folder(folder: &Path) -> bool {
    folder.iter().any(|segment| {
        let segment = segment.to_string_lossy().to_lowercase().replace('_', " ");
        FOLDER_KEYWORDS.iter().any(|keyword| segment.contains(keyword))
    })
}

/// Checks if a PDF filename contains all required terms
/// (ignoring case, underscores treated as spaces).
pub fn is_candidate_pdf(file_name: &str) -> bool {
    if !file_name.to_lowercase().ends_with(".pdf") {
        return false;
    }
    let normalized = file_name.replace('_', " ").to_lowercase();
    REQUIRED_TERMS.iter().all(|term| normalized.contains(term))
}

/// Searches for report PDFs in relevant folders across multiple levels.
///
/// Traversal order is the OS directory-walk order; callers must not rely on
/// it beyond determinism within a single run. A failure to enumerate the
/// tree (e.g. an unreadable directory) propagates to the caller and aborts
/// the walk.
pub fn find_candidates(root: &Path) -> Result<Vec<CandidateDocument>, walkdir::Error> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let folder = match entry.path().parent() {
            Some(parent) => parent,
            None => continue,
        };
        if !is_relevant_folder(folder) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if is_candidate_pdf(&file_name) {
            candidates.push(CandidateDocument {
                path: entry.path().to_path_buf(),
                folder: folder.to_path_buf(),
                file_name,
            });
        }
    }

    Ok(candidates)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const REPORT_NAME: &str = "Incidence_and_Rate_of_Suicides_State_UT_City_wise_2020.pdf";

    #[test]
    fn test_relevant_folder_detection() {
        assert!(is_relevant_folder(Path::new("all_pdfs/2020/Suicide_Reports")));
        assert!(is_relevant_folder(Path::new("data/Suicides_in_India/tables")));
        // Keyword match is on individual segments, case-insensitive
        assert!(is_relevant_folder(Path::new("SUICIDE_DATA")));
        assert!(!is_relevant_folder(Path::new("all_pdfs/2020/Accident_Reports")));
        assert!(!is_relevant_folder(Path::new("")));
    }

    #[test]
    fn test_candidate_pdf_requires_all_terms() {
        assert!(is_candidate_pdf(REPORT_NAME));
        // Missing "City"
        assert!(!is_candidate_pdf(
            "Incidence_and_Rate_of_Suicides_State_wise_2020.pdf"
        ));
        // Right terms, wrong extension
        assert!(!is_candidate_pdf(
            "Incidence_and_Rate_of_Suicides_State_UT_City_wise_2020.txt"
        ));
        assert!(!is_candidate_pdf("random.pdf"));
    }

    #[test]
    fn test_find_candidates_walks_relevant_folders_only() {
        let root = tempfile::tempdir().unwrap();
        let relevant = root.path().join("Suicide_Reports").join("2020");
        let irrelevant = root.path().join("Accident_Reports").join("2020");
        fs::create_dir_all(&relevant).unwrap();
        fs::create_dir_all(&irrelevant).unwrap();

        fs::write(relevant.join(REPORT_NAME), b"%PDF-1.4").unwrap();
        fs::write(relevant.join("notes.pdf"), b"%PDF-1.4").unwrap();
        fs::write(irrelevant.join(REPORT_NAME), b"%PDF-1.4").unwrap();

        let candidates = find_candidates(root.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_name, REPORT_NAME);
        assert!(candidates[0].folder.ends_with("Suicide_Reports/2020"));
    }
}
