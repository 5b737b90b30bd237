//! Markdown-flavoured rendering of the scraped listings.
//!
//! The output depends only on the listings (in order), the search term and
//! the injected timestamp, so a run can be reproduced exactly in tests.

use crate::models::JobListing;
use crate::utils::upcase;
use chrono::{DateTime, Local};
use std::fmt::Write;
use tracing::{debug, instrument};

/// Render the full document: a header block followed by one section per
/// listing, each closed by a `---` rule.
///
/// # Arguments
///
/// * `search_term` - Term the listings were searched for, used in the heading
/// * `listings` - Listings in discovery order
/// * `generated_at` - Timestamp printed as the last update time
#[instrument(level = "info", skip_all, fields(count = listings.len()))]
pub fn render_document(
    search_term: &str,
    listings: &[JobListing],
    generated_at: DateTime<Local>,
) -> String {
    let mut md = String::new();

    writeln!(md, "# {} pracovní nabídky", upcase(search_term)).unwrap();
    writeln!(
        md,
        "Poslední aktualizace: {}",
        generated_at.format("%d.%m.%Y %H:%M")
    )
    .unwrap();
    writeln!(md, "Počet nalezených nabídek: {}\n", listings.len()).unwrap();

    for listing in listings {
        write_listing(&mut md, listing);
    }

    debug!(bytes = md.len(), "Rendered document");
    md
}

fn write_listing(md: &mut String, listing: &JobListing) {
    writeln!(md, "## {}", listing.title).unwrap();
    writeln!(md, "URL adresa: {}", listing.url).unwrap();
    if let Some(job_id) = &listing.job_id {
        writeln!(md, "ID inzerátu: {job_id}").unwrap();
    }
    writeln!(md, "Společnost: {}", listing.company).unwrap();
    writeln!(md, "Lokalita: {}", listing.location).unwrap();
    writeln!(md, "Text inzerátu:\n{}\n\n---\n", listing.description).unwrap();
}
