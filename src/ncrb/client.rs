// src/ncrb/client.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::ncrb::models::{clean_file_name, format_folder_name, PdfLink};
use crate::utils::error::NcrbError;

// The NCRB site serves one table-of-contents page per report year.
const BASE_URL_TEMPLATE: &str =
    "https://ncrb.gov.in/accidental-deaths-suicides-in-india-table-content.html?year={year}&category=";

const NCRB_USER_AGENT: &str = "ncrb_extractor/0.1 (research data collection)";

// Be polite to the host between page fetches.
const PAGE_REQUEST_DELAY_MS: u64 = 3000;

// --- CSS Selectors (Lazy Static) ---
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2.c-genriccontent__subhead").expect("Failed to compile HEADING_SELECTOR")
});

static LISTING_TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.c-table").expect("Failed to compile LISTING_TABLE_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static NUMBER_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.w-10").expect("Failed to compile NUMBER_CELL_SELECTOR"));

static TITLE_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.w-70").expect("Failed to compile TITLE_CELL_SELECTOR"));

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Failed to compile LINK_SELECTOR"));

/// Creates a reqwest client configured for NCRB interaction.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(NCRB_USER_AGENT)
        .build()
}

/// URL of the table-of-contents page for a report year.
pub fn index_url(year: u32) -> String {
    BASE_URL_TEMPLATE.replace("{year}", &year.to_string())
}

/// Fetches the table-of-contents page for one year and extracts every PDF
/// link grouped under its category heading.
pub async fn fetch_report_index(
    client: &reqwest::Client,
    year: u32,
) -> Result<Vec<PdfLink>, NcrbError> {
    let url = index_url(year);
    tracing::info!("Fetching report index for year {}", year);

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Failed to fetch the webpage for year {}: {}", year, status);
        return Err(NcrbError::Http(status));
    }
    let body = response.text().await?;

    tokio::time::sleep(Duration::from_millis(PAGE_REQUEST_DELAY_MS)).await;

    parse_report_index(&body, &url, year)
}

/// Pure HTML-parsing half of the index fetch, separated so it can be
/// exercised on fixture pages.
pub fn parse_report_index(
    html: &str,
    base_url: &str,
    year: u32,
) -> Result<Vec<PdfLink>, NcrbError> {
    let base = reqwest::Url::parse(base_url).map_err(|e| NcrbError::Parse(e.to_string()))?;
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    // Loop through the category headings and collect links from the table
    // that follows each one.
    for heading in document.select(&HEADING_SELECTOR) {
        let heading_text = heading.text().collect::<String>();
        let category = format_folder_name(heading_text.trim());

        let table = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| LISTING_TABLE_SELECTOR.matches(el));
        let Some(table) = table else { continue };

        for row in table.select(&ROW_SELECTOR).skip(1) {
            // Skip header row
            if row.select(&NUMBER_CELL_SELECTOR).next().is_none() {
                continue;
            }
            let Some(title_cell) = row.select(&TITLE_CELL_SELECTOR).next() else {
                continue;
            };
            let Some(href) = row
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|link| link.value().attr("href"))
            else {
                continue;
            };

            let url = base
                .join(href)
                .map_err(|e| NcrbError::Parse(e.to_string()))?
                .to_string();
            let title = title_cell.text().collect::<String>();
            let file_name = format!("{}.pdf", clean_file_name(title.trim()));

            links.push(PdfLink {
                url,
                file_name,
                category: category.clone(),
                year,
            });
        }
    }

    Ok(links)
}

/// Downloads one report PDF into `<out_root>/<year>/<category>/`.
pub async fn download_report(
    client: &reqwest::Client,
    link: &PdfLink,
    out_root: &Path,
) -> Result<PathBuf, NcrbError> {
    let target = link.target_path(out_root);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let response = client.get(&link.url).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Failed to download: {}", link.url);
        return Err(NcrbError::Http(status));
    }

    let body = response.bytes().await?;
    std::fs::write(&target, &body)?;

    tracing::info!("Downloaded: {} in {}", link.file_name, target.parent().unwrap_or(out_root).display());
    Ok(target)
}
