pub mod client;
mod models;
mod search_error;

pub use client::AdzunaClient;
pub use search_error::SearchError;

use crate::domain::Job;

/// One page of upstream search results.
///
/// Implementations report failures through `Err`; the feed controller is
/// the one that decides to treat a failed page as an empty one.
pub trait JobSearchClient: Send + Sync {
    fn fetch_page(&self, page: u32, query: &str) -> Result<Vec<Job>, SearchError>;
}
