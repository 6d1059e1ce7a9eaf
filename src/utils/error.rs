// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum NcrbError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse NCRB page: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Extraction backend failed for {}: {reason}", .path.display())]
    Backend { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} has no usable data", .0.display())]
    Empty(PathBuf),

    #[error(
        "Column mismatch in {}: data has {found} columns, but expected {expected}",
        .path.display()
    )]
    SchemaMismatch {
        path: PathBuf,
        found: usize,
        expected: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error), // The only path-level fatal condition

    #[error("NCRB interaction failed: {0}")]
    Ncrb(#[from] NcrbError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Cleaning failed: {0}")]
    Clean(#[from] CleanError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
