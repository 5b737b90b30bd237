//! # jobs_doc_sync
//!
//! Scrapes paginated job listings from jobs.cz, pulls the full description of
//! every listing from its detail page, renders the result as one text
//! document and replaces the content of a Google Doc with it.
//!
//! ## Usage
//!
//! ```sh
//! GOOGLE_SERVICE_ACCOUNT="$(cat key.json)" GOOGLE_DOC_ID=1AbC... jobs_doc_sync
//! ```
//!
//! ## Architecture
//!
//! The application runs strictly in sequence:
//! 1. **Configuration**: Validate the document id and service account key
//! 2. **Pagination**: Probe result pages until the board runs out
//! 3. **Extraction**: Resolve each result card and its detail page
//! 4. **Rendering**: Build the document text
//! 5. **Publishing**: Replace the remote document's content in one batch
//!
//! The process exits non-zero when configuration is invalid, nothing was
//! scraped, or the document update fails.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod docs;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::{SiteConfig, SyncConfig};
use docs::RemoteSync;
use docs::client::GoogleDocsClient;
use error::AppError;
use outputs::markdown::render_document;
use pipeline::ScrapeRun;
use scrapers::fetch::HttpFetcher;
use scrapers::jobs_cz::JobsCz;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("jobs_doc_sync starting up");
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let args = Cli::parse();
    debug!(search_term = %args.search_term, base_url = %args.base_url, "Parsed CLI arguments");

    // ---- Configuration is validated before any network activity ----
    let sync_config = SyncConfig::from_cli(&args).inspect_err(|e| {
        error!(error = %e, "Invalid sync configuration");
    })?;
    let site = SiteConfig::from_cli(&args)?;
    let docs_client = GoogleDocsClient::new(sync_config.credentials.clone()).inspect_err(|e| {
        error!(error = %e, "Service account credentials are unusable");
    })?;
    let fetcher = HttpFetcher::new(site.request_timeout)?;
    info!(
        document_id = %sync_config.document_id,
        client_email = %sync_config.credentials.client_email,
        "Configuration loaded"
    );

    // ---- Scrape ----
    let mut run = ScrapeRun::new(&fetcher, &site, JobsCz);
    if !run.run().await {
        error!("No job listings scraped; leaving the document untouched");
        return Err(AppError::NoListings.into());
    }
    let stats = run.stats();
    info!(
        count = run.listings().len(),
        pages_skipped = stats.pages_skipped,
        dropped = stats.listings_dropped,
        "Scraped job listings"
    );
    let listings = run.into_listings();

    // ---- Render & publish ----
    let document = render_document(&site.search_term, &listings, Local::now());
    let sync = RemoteSync::new(docs_client);
    if !sync.publish(&sync_config.document_id, &document).await {
        return Err(AppError::Publish {
            document_id: sync_config.document_id,
        }
        .into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        listings = listings.len(),
        "Execution complete"
    );

    Ok(())
}
