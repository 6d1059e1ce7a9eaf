// src/main.rs
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};

use ncrb_extractor::aggregate::aggregate;
use ncrb_extractor::clean::{clean_csv, CITY_COLUMNS, ROW_GAP_THRESHOLD, STATE_COLUMNS};
use ncrb_extractor::extract::StreamPdfReader;
use ncrb_extractor::select::find_candidates;
use ncrb_extractor::storage::{StorageManager, CITY_DATA_FILE, STATE_DATA_FILE};
use ncrb_extractor::utils::{self, AppError};

/// Command Line Interface for the suicide-statistics table extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the folder containing the report PDFs
    folder: String,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let start = Instant::now();
    let args = Args::parse();
    info!("Scanning {}", args.folder);

    // 3. Discover candidate documents. A failure to enumerate the tree is
    //    the one fatal condition; everything downstream recovers locally.
    let candidates = find_candidates(Path::new(&args.folder))?;
    info!("Found {} candidate documents", candidates.len());

    // 4. Extract, normalize and accumulate per category
    let reader = StreamPdfReader::default();
    let (state_data, city_data) = aggregate(&reader, &candidates);

    // 5. Persist non-empty accumulators as intermediate files
    let storage = StorageManager::new(".")?;
    if !state_data.is_empty() {
        storage.write_dataset(&state_data, STATE_DATA_FILE)?;
    }
    if !city_data.is_empty() {
        storage.write_dataset(&city_data, CITY_DATA_FILE)?;
    }

    // 6. Clean each intermediate into its final artifact; a failure for one
    //    file leaves the other's cleaning untouched
    for (file_name, columns) in [
        (STATE_DATA_FILE, &STATE_COLUMNS[..]),
        (CITY_DATA_FILE, &CITY_COLUMNS[..]),
    ] {
        let path = storage.intermediate_path(file_name);
        if let Err(e) = clean_csv(&storage, &path, columns, ROW_GAP_THRESHOLD) {
            warn!("Error processing {}: {}", path.display(), e);
        }
    }

    info!("Total time taken: {:.2?}", start.elapsed());
    Ok(())
}
