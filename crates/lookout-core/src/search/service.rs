//! Search collaborator contracts.

use async_trait::async_trait;

use super::model::SearchResult;

/// Runs a web search.
///
/// Implementations never fail: transport or parsing errors are logged and
/// reported as an empty result list.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Vec<SearchResult>;
}

/// Fetches a page and extracts its readable text.
///
/// Returns an empty string on any failure.
#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> String;
}
