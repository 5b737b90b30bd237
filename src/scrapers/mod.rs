//! Job board scraping.
//!
//! The pipeline runs in two phases:
//!
//! 1. **Pagination**: [`pagination::PaginationWalker`] probes result pages
//!    until one of the termination markers shows up
//! 2. **Extraction**: [`listing::ListingExtractor`] turns each search result
//!    card into a [`JobListing`](crate::models::JobListing), fetching its
//!    detail page for the description
//!
//! Site-specific markup lives in [`jobs_cz`]. A new board supplies its own
//! [`DescriptionSource`] without touching the orchestration in
//! [`crate::pipeline`].

pub mod fetch;
pub mod jobs_cz;
pub mod listing;
pub mod pagination;

use fetch::Page;

/// Pulls the description text out of a listing's detail page.
pub trait DescriptionSource {
    /// Cleaned description, or `None` when the page has no description
    /// container.
    fn extract_description(&self, page: &Page) -> Option<String>;
}
