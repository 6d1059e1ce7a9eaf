// src/bin/scrape.rs
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};

use ncrb_extractor::ncrb::client;
use ncrb_extractor::utils::error::NcrbError;
use ncrb_extractor::utils::{self, AppError};

/// Downloads NCRB "Accidental Deaths & Suicides in India" report PDFs,
/// organized into folders by year and category.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First report year to fetch
    #[arg(long, default_value_t = 1950)]
    start_year: u32,

    /// Last report year to fetch (inclusive)
    #[arg(long, default_value_t = 2022)]
    end_year: u32,

    /// Output directory for the downloaded PDF tree
    #[arg(short, long, default_value = "all_ncrb_pdfs")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    utils::logging::setup_logging();

    let start = Instant::now();
    let args = Args::parse();
    info!(
        "Fetching report years {}..={} into {}",
        args.start_year,
        args.end_year,
        args.out.display()
    );

    let client = client::build_client().map_err(NcrbError::Network)?;

    for year in args.start_year..=args.end_year {
        let links = match client::fetch_report_index(&client, year).await {
            Ok(links) => links,
            Err(e) => {
                // Best effort: a missing or malformed year page is skipped
                error!("Skipping year {}: {}", year, e);
                continue;
            }
        };

        if links.is_empty() {
            info!("No PDFs found for year {}. Skipping...", year);
            continue;
        }
        info!("Year {}: {} PDFs", year, links.len());

        // Downloads are sequential; the host is slow and rate-sensitive.
        for link in &links {
            if let Err(e) = client::download_report(&client, link, &args.out).await {
                error!("Error downloading {}: {}", link.url, e);
            }
        }
    }

    info!("Total time taken: {:.2?}", start.elapsed());
    Ok(())
}
