//! Page retrieval and the typed query surface over parsed markup.
//!
//! [`PageFetcher`] is the only way the scraping stages reach the network.
//! [`HttpFetcher`] sends one GET with browser-like headers and a fixed
//! timeout. Failures are handed back as an [`AppError`] and each caller
//! logs them at the level its skip/stop policy calls for. There are no
//! retries.

use crate::error::{AppError, Result};
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS,
    USER_AGENT,
};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// A parsed HTML document.
pub struct Page {
    document: Html,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    pub fn find_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }

    pub fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.document.select(selector).collect()
    }

    /// Whether any text node in the document contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.document
            .root_element()
            .text()
            .any(|chunk| chunk.contains(needle))
    }
}

/// First descendant of `element` matching `selector`.
pub fn find_in<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Visible text of an element: trimmed text nodes joined by single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Retrieves and parses one page.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn get_markup(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| AppError::transport(url, e))
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Page> {
        match self.get_markup(url).await {
            Ok(markup) => {
                debug!(%url, bytes = markup.len(), "Fetched page");
                Ok(Page::parse(&markup))
            }
            Err(e) => {
                debug!(%url, error = %e, "Page fetch failed");
                Err(e)
            }
        }
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    /// Serves canned markup by url; unknown urls fail with HTTP 404.
    ///
    /// Urls registered with [`ScriptedFetcher::with_responses`] answer from
    /// their queue first (`None` is a failed fetch) and fall back to the
    /// static pages once it is drained.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        pages: HashMap<String, String>,
        queued: RefCell<HashMap<String, VecDeque<Option<String>>>>,
        pub requested: RefCell<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
            self.pages.insert(url.into(), markup.into());
            self
        }

        pub fn with_responses(
            self,
            url: impl Into<String>,
            responses: impl IntoIterator<Item = Option<&'static str>>,
        ) -> Self {
            self.queued.borrow_mut().insert(
                url.into(),
                responses.into_iter().map(|r| r.map(str::to_string)).collect(),
            );
            self
        }
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<Page> {
            self.requested.borrow_mut().push(url.to_string());
            let queued = self
                .queued
                .borrow_mut()
                .get_mut(url)
                .and_then(VecDeque::pop_front);
            let markup = match queued {
                Some(response) => response,
                None => self.pages.get(url).cloned(),
            };
            match markup {
                Some(markup) => Ok(Page::parse(&markup)),
                None => Err(AppError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }
}
