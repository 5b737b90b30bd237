//! Scrape orchestration.
//!
//! [`ScrapeRun`] asks the [`PaginationWalker`] how many result pages exist,
//! then walks them in order, resolving every card through the
//! [`ListingExtractor`]. A page that fails to load or has no cards is
//! skipped; the run continues with the next page. Listings are kept in
//! discovery order.

use crate::config::SiteConfig;
use crate::models::JobListing;
use crate::scrapers::DescriptionSource;
use crate::scrapers::fetch::{PageFetcher, element_text};
use crate::scrapers::jobs_cz::{CARD, COUNT_HEADER};
use crate::scrapers::listing::ListingExtractor;
use crate::scrapers::pagination::PaginationWalker;
use crate::utils::parse_digits;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub pages_scraped: u32,
    pub pages_skipped: u32,
    pub listings_dropped: u32,
}

pub struct ScrapeRun<'a, F, D> {
    fetcher: &'a F,
    site: &'a SiteConfig,
    extractor: ListingExtractor<'a, F, D>,
    listings: Vec<JobListing>,
    stats: RunStats,
}

impl<'a, F, D> ScrapeRun<'a, F, D>
where
    F: PageFetcher,
    D: DescriptionSource,
{
    pub fn new(fetcher: &'a F, site: &'a SiteConfig, descriptions: D) -> Self {
        Self {
            fetcher,
            site,
            extractor: ListingExtractor::new(fetcher, site, descriptions),
            listings: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Scrape every result page. Returns `true` if at least one listing was
    /// collected.
    #[instrument(level = "info", skip_all, fields(term = %self.site.search_term))]
    pub async fn run(&mut self) -> bool {
        let total_pages = PaginationWalker::new(self.fetcher, self.site)
            .total_pages()
            .await;
        info!(total_pages, "Found pages to scrape");

        self.report_total_count().await;

        for page in 1..=total_pages {
            self.scrape_page(page, total_pages).await;
            if page < total_pages {
                sleep(self.site.page_delay).await;
            }
        }

        info!(
            listings = self.listings.len(),
            pages_scraped = self.stats.pages_scraped,
            pages_skipped = self.stats.pages_skipped,
            dropped = self.stats.listings_dropped,
            "Scrape finished"
        );
        !self.listings.is_empty()
    }

    pub fn listings(&self) -> &[JobListing] {
        &self.listings
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn into_listings(self) -> Vec<JobListing> {
        self.listings
    }

    async fn scrape_page(&mut self, page: u32, total_pages: u32) {
        let url = self.site.search_url((page > 1).then_some(page));
        info!(page, total_pages, "Scraping page");

        let Ok(document) = self.fetcher.fetch(&url).await else {
            error!(page, %url, "Failed to fetch page; skipping");
            self.stats.pages_skipped += 1;
            return;
        };

        let cards = document.find_all(&CARD);
        if cards.is_empty() {
            warn!(page, "No job items found on page; skipping");
            self.stats.pages_skipped += 1;
            return;
        }
        info!(page, count = cards.len(), "Found job items on page");

        for card in cards {
            match self.extractor.extract(card).await {
                Some(listing) => {
                    info!(
                        n = self.listings.len() + 1,
                        title = %listing.title,
                        company = %listing.company,
                        "Scraped job"
                    );
                    self.listings.push(listing);
                }
                None => self.stats.listings_dropped += 1,
            }
        }
        self.stats.pages_scraped += 1;
    }

    /// Log the result count the site advertises. Best effort only.
    async fn report_total_count(&self) {
        let url = self.site.search_url(None);
        let Ok(document) = self.fetcher.fetch(&url).await else {
            warn!(%url, "Failed to fetch initial page; total job count unknown");
            return;
        };

        match document
            .find_first(&COUNT_HEADER)
            .map(element_text)
            .as_deref()
            .and_then(parse_digits)
        {
            Some(count) => info!(count, "Total jobs advertised"),
            None => warn!("Could not parse total job count"),
        }
    }
}
