//! Retrieval of raw postings from the job board.

mod fetcher;
mod parser;

pub use fetcher::ListingFetcher;
pub use parser::parse_postings;

use crate::workflows::tracking::JobId;

/// Location text recorded when a posting carries no location element.
pub const MISSING_LOCATION: &str = "None";

/// One job listing as scraped from the board for a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub title: String,
    pub id: JobId,
    pub location: String,
}

impl Posting {
    pub fn new(title: impl Into<String>, id: impl Into<JobId>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("failed to fetch listing page: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid posting selector '{selector}': {detail}")]
    Selector { selector: &'static str, detail: String },
    #[error("posting #{index} is malformed: {reason}")]
    MalformedPosting { index: usize, reason: &'static str },
}
