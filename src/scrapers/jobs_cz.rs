//! jobs.cz markup knowledge.
//!
//! Selectors for search result pages and the description container of a
//! detail page. Search pages are served from `https://www.jobs.cz/prace/?q[]=...`
//! and detail pages from `https://www.jobs.cz/rpd/<id>/`.

use super::DescriptionSource;
use super::fetch::Page;
use crate::utils::clean_text;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// Text shown when a result page index is past the last page.
pub const PAGE_UNAVAILABLE_MARKER: &str = "Zadaná stránka už není dostupná";

pub static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("article.SearchResultCard").unwrap());
pub static CARD_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2.SearchResultCard__title").unwrap());
pub static TITLE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.link-primary").unwrap());
pub static COMPANY: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"span[translate="no"]"#).unwrap());
pub static LOCALITY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"li[data-test="serp-locality"]"#).unwrap());
pub static NO_RESULTS: Lazy<Selector> = Lazy::new(|| Selector::parse("div.SearchNoResults").unwrap());
pub static RESULT_LIST: Lazy<Selector> = Lazy::new(|| Selector::parse("div.SearchResultList").unwrap());
pub static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
pub static COUNT_HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1.SearchHeader__title").unwrap());
static DESCRIPTION_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-jobad="body"]"#).unwrap());

static JOB_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/rpd/(\d+)").unwrap());

const NON_CONTENT: [&str; 5] = ["script", "style", "nav", "header", "footer"];

/// Numeric listing id embedded in a detail url.
pub fn job_id_from_url(url: &str) -> Option<String> {
    JOB_ID.captures(url).map(|caps| caps[1].to_string())
}

/// Description extraction for jobs.cz detail pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct JobsCz;

impl DescriptionSource for JobsCz {
    fn extract_description(&self, page: &Page) -> Option<String> {
        let body = page.find_first(&DESCRIPTION_BODY)?;
        Some(clean_text(&visible_text(body)))
    }
}

/// Trimmed text nodes of `container`, one per line, skipping anything
/// nested in script, style or page chrome elements.
fn visible_text(container: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    for node in container.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| *ancestor != *container)
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| NON_CONTENT.contains(&el.name()))
            });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }
    lines.join("\n")
}
