//! Search result card to [`JobListing`] resolution.
//!
//! A card without a title or link is dropped. Missing company, location,
//! job id or description only degrade the listing to defaults, each logged
//! at warning level.

use super::DescriptionSource;
use super::fetch::{PageFetcher, element_text, find_in};
use super::jobs_cz::{CARD_TITLE, COMPANY, LOCALITY, TITLE_LINK, job_id_from_url};
use crate::config::SiteConfig;
use crate::models::{DEFAULT_LOCATION, JobListing};
use scraper::ElementRef;
use tracing::{debug, instrument, warn};

/// Builds listings from cards, enriching each with its detail page.
pub struct ListingExtractor<'a, F, D> {
    fetcher: &'a F,
    site: &'a SiteConfig,
    descriptions: D,
}

impl<'a, F, D> ListingExtractor<'a, F, D>
where
    F: PageFetcher,
    D: DescriptionSource,
{
    pub fn new(fetcher: &'a F, site: &'a SiteConfig, descriptions: D) -> Self {
        Self {
            fetcher,
            site,
            descriptions,
        }
    }

    /// Resolve one card, or `None` when it has no title or usable link.
    #[instrument(level = "debug", skip_all)]
    pub async fn extract(&self, card: ElementRef<'_>) -> Option<JobListing> {
        let Some(title_elem) = find_in(card, &CARD_TITLE) else {
            warn!("Card has no title; dropping");
            return None;
        };
        let title = element_text(title_elem);
        if title.is_empty() {
            warn!("Card title is empty; dropping");
            return None;
        }

        let Some(href) = find_in(title_elem, &TITLE_LINK).and_then(|a| a.value().attr("href"))
        else {
            warn!(%title, "Card has no detail link; dropping");
            return None;
        };
        let Some(url) = self.site.absolutize(href) else {
            warn!(%title, %href, "Card link cannot be resolved; dropping");
            return None;
        };

        let job_id = job_id_from_url(&url);
        if job_id.is_none() {
            warn!(%url, "No job id in listing url");
        }

        let company = match find_in(card, &COMPANY) {
            Some(elem) => element_text(elem),
            None => {
                warn!(%title, "Card has no company");
                String::new()
            }
        };
        let location = match find_in(card, &LOCALITY) {
            Some(elem) => element_text(elem),
            None => {
                warn!(%title, "Card has no location; using default");
                DEFAULT_LOCATION.to_string()
            }
        };

        let description = self.describe(&url).await;
        debug!(%title, %url, chars = description.chars().count(), "Extracted listing");

        Some(JobListing {
            title,
            company,
            location,
            url,
            job_id,
            description,
        })
    }

    async fn describe(&self, url: &str) -> String {
        match self.fetcher.fetch(url).await {
            Ok(page) => self.descriptions.extract_description(&page).unwrap_or_else(|| {
                warn!(%url, "Detail page has no description container");
                String::new()
            }),
            Err(e) => {
                warn!(%url, error = %e, "Detail page unavailable; description left empty");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fetch::Page;
    use crate::scrapers::fetch::testing::ScriptedFetcher;
    use crate::scrapers::jobs_cz::{CARD, JobsCz};

    const DETAIL: &str = r#"<html><body>
        <div data-jobad="body"><p>Hledáme   Python vývojáře.</p><footer>patička</footer></div>
    </body></html>"#;

    fn card_page(inner: &str) -> Page {
        Page::parse(&format!(
            r#"<html><body><div class="SearchResultList">
                <article class="SearchResultCard">{inner}</article>
            </div></body></html>"#
        ))
    }

    async fn extract_single(fetcher: &ScriptedFetcher, page: &Page) -> Option<JobListing> {
        let site = SiteConfig::default();
        let extractor = ListingExtractor::new(fetcher, &site, JobsCz);
        let card = page.find_first(&CARD).unwrap();
        extractor.extract(card).await
    }

    #[tokio::test]
    async fn test_extracts_full_card() {
        let fetcher = ScriptedFetcher::default()
            .with_page("https://www.jobs.cz/rpd/2000123456/", DETAIL);
        let page = card_page(
            r#"<h2 class="SearchResultCard__title">
                   <a class="link-primary" href="https://www.jobs.cz/rpd/2000123456/">Python Developer</a>
               </h2>
               <ul>
                   <li><span translate="no">Acme s.r.o.</span></li>
                   <li data-test="serp-locality">Praha – Karlín</li>
               </ul>"#,
        );

        let listing = extract_single(&fetcher, &page).await.unwrap();
        assert_eq!(
            listing,
            JobListing {
                title: "Python Developer".to_string(),
                company: "Acme s.r.o.".to_string(),
                location: "Praha – Karlín".to_string(),
                url: "https://www.jobs.cz/rpd/2000123456/".to_string(),
                job_id: Some("2000123456".to_string()),
                description: "Hledáme Python vývojáře.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_card_without_title_is_dropped() {
        let fetcher = ScriptedFetcher::default();
        let page = card_page(r#"<a class="link-primary" href="/rpd/1/">Orphan link</a>"#);

        assert!(extract_single(&fetcher, &page).await.is_none());
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_card_without_link_is_dropped() {
        let fetcher = ScriptedFetcher::default();
        let page = card_page(
            r#"<h2 class="SearchResultCard__title"><a class="link-primary">No href</a></h2>"#,
        );

        assert!(extract_single(&fetcher, &page).await.is_none());
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_missing_company_and_location_use_defaults() {
        let fetcher = ScriptedFetcher::default().with_page("https://www.jobs.cz/rpd/123/job", DETAIL);
        let page = card_page(
            r#"<h2 class="SearchResultCard__title"><a class="link-primary" href="/rpd/123/job">Data Engineer</a></h2>"#,
        );

        let listing = extract_single(&fetcher, &page).await.unwrap();
        assert_eq!(listing.company, "");
        assert_eq!(listing.location, "Remote");
        assert_eq!(listing.url, "https://www.jobs.cz/rpd/123/job");
        assert_eq!(listing.job_id.as_deref(), Some("123"));
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_leaves_description_empty() {
        let fetcher = ScriptedFetcher::default();
        let page = card_page(
            r#"<h2 class="SearchResultCard__title"><a class="link-primary" href="/fp/acme/nabidka">Tester</a></h2>"#,
        );

        let listing = extract_single(&fetcher, &page).await.unwrap();
        assert_eq!(listing.description, "");
        assert_eq!(listing.job_id, None);
        assert_eq!(
            fetcher.requested.borrow().as_slice(),
            ["https://www.jobs.cz/fp/acme/nabidka"]
        );
    }
}
