//! Data model for scraped job listings.

/// Location used when a card does not name one.
pub const DEFAULT_LOCATION: &str = "Remote";

/// One job posting resolved from a search result card and its detail page.
///
/// A listing is only built once a title and an absolute url are known;
/// every other field falls back to a default instead of dropping the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub title: String,
    /// Hiring company, empty when the card omits it.
    pub company: String,
    /// Work location, [`DEFAULT_LOCATION`] when the card omits it.
    pub location: String,
    /// Absolute url of the detail page.
    pub url: String,
    /// Numeric listing id taken from the url path, if it has one.
    pub job_id: Option<String>,
    /// Cleaned description text; empty when the detail page was unavailable.
    pub description: String,
}
