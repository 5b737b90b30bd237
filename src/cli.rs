//! Command-line interface definitions for jobs_doc_sync.
//!
//! Every option can also be supplied through the environment (or a `.env`
//! file, which `main` loads before parsing).

use clap::Parser;

/// Command-line arguments for the scraper and document publisher.
///
/// # Examples
///
/// ```sh
/// # Credentials and target document from the environment
/// GOOGLE_SERVICE_ACCOUNT="$(cat key.json)" GOOGLE_DOC_ID=1AbC... jobs_doc_sync
///
/// # Different search term, faster probing
/// jobs_doc_sync --search-term rust --probe-delay-ms 500 --document-id 1AbC...
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Identifier of the Google Doc whose content is replaced
    #[arg(long, env = "GOOGLE_DOC_ID")]
    pub document_id: Option<String>,

    /// Service account credentials as a JSON string
    #[arg(long, env = "GOOGLE_SERVICE_ACCOUNT", hide_env_values = true)]
    pub service_account: Option<String>,

    /// Path to a service account JSON key file (used when the JSON string is absent)
    #[arg(long)]
    pub service_account_file: Option<String>,

    /// Search term sent as the `q[]` query parameter
    #[arg(short, long, env = "JOBS_SEARCH_TERM", default_value = "python")]
    pub search_term: String,

    /// Origin of the job board
    #[arg(long, default_value = "https://www.jobs.cz")]
    pub base_url: String,

    /// Path of the search endpoint on the job board
    #[arg(long, default_value = "/prace/")]
    pub search_path: String,

    /// Upper bound on the number of result pages probed
    #[arg(long, default_value_t = 50)]
    pub max_pages: u32,

    /// Delay between pagination probes, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub probe_delay_ms: u64,

    /// Delay between result page fetches, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub page_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}
