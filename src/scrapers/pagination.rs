//! Discovery of the number of search result pages.
//!
//! Pages are probed one by one starting at 1. A probe ends the walk when:
//!
//! - the fetch fails (the failed index is kept; the scrape pass skips it)
//! - the page has no cards and shows the "no results" block or an empty
//!   results container (the index is kept)
//! - the page carries the "page not available" text (the walk backs up one)
//!
//! The card check runs before the marker check on each page. The walk never
//! goes past `max_pages`.

use super::fetch::{Page, PageFetcher};
use super::jobs_cz::{ARTICLE, CARD, NO_RESULTS, PAGE_UNAVAILABLE_MARKER, RESULT_LIST};
use crate::config::SiteConfig;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

pub struct PaginationWalker<'a, F> {
    fetcher: &'a F,
    site: &'a SiteConfig,
}

impl<'a, F: PageFetcher> PaginationWalker<'a, F> {
    pub fn new(fetcher: &'a F, site: &'a SiteConfig) -> Self {
        Self { fetcher, site }
    }

    /// Index of the last result page worth scraping.
    #[instrument(level = "info", skip_all)]
    pub async fn total_pages(&self) -> u32 {
        let mut page = 1;
        loop {
            let url = self.site.search_url(Some(page));
            let Ok(document) = self.fetcher.fetch(&url).await else {
                warn!(page, "Probe fetch failed; stopping pagination");
                break;
            };

            let cards = document.find_all(&CARD).len();
            if cards == 0 && shows_no_results(&document) {
                info!(page, "No results on page; reached end of listings");
                break;
            }

            if document.contains_text(PAGE_UNAVAILABLE_MARKER) {
                info!(page, "Page not available; reached end of listings");
                page -= 1;
                break;
            }

            info!(page, cards, "Found jobs on page");
            if page >= self.site.max_pages {
                warn!(max_pages = self.site.max_pages, "Page cap reached; stopping pagination");
                break;
            }
            page += 1;
            sleep(self.site.probe_delay).await;
        }

        info!(total_pages = page, "Total pages found");
        page
    }
}

fn shows_no_results(document: &Page) -> bool {
    if document.find_first(&NO_RESULTS).is_some() {
        return true;
    }
    document
        .find_first(&RESULT_LIST)
        .is_some_and(|list| list.select(&ARTICLE).next().is_none())
}
