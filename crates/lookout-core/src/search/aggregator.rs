//! Multi-query search aggregation.
//!
//! Results from every query are concatenated in order, then scraped batch by
//! batch. A batch's pages are fetched concurrently but merged in result order.
//! Aggregation stops as soon as the merged text reaches the word target, and
//! never looks past the hard page limit.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use super::model::{AggregatedContent, SearchResult};
use super::service::{PageScraper, SearchProvider};
use crate::config::AggregationLimits;

/// Orchestrates a [`SearchProvider`] and a [`PageScraper`].
#[derive(Clone)]
pub struct ContentAggregator {
    provider: Arc<dyn SearchProvider>,
    scraper: Arc<dyn PageScraper>,
}

impl ContentAggregator {
    pub fn new(provider: Arc<dyn SearchProvider>, scraper: Arc<dyn PageScraper>) -> Self {
        Self { provider, scraper }
    }

    /// Searches every query and merges scraped page text.
    ///
    /// Returns empty content when no query produced results. A link seen once
    /// is never scraped or merged again within the same call.
    pub async fn aggregate(
        &self,
        queries: &[String],
        limits: AggregationLimits,
    ) -> AggregatedContent {
        let mut results: Vec<SearchResult> = Vec::new();
        for query in queries {
            let hits = self.provider.search(query).await;
            tracing::debug!(query = %query, hits = hits.len(), "Search completed");
            results.extend(hits);
        }

        let mut content = AggregatedContent::default();
        if results.is_empty() {
            return content;
        }

        let batch_size = limits.batch_size.max(1);
        let considered = results.len().min(limits.hard_page_limit);
        let mut seen: HashSet<String> = HashSet::new();

        for batch in results[..considered].chunks(batch_size) {
            let fresh: Vec<&SearchResult> = batch
                .iter()
                .filter(|result| seen.insert(result.link.clone()))
                .collect();

            let pages = join_all(fresh.iter().map(|result| self.scraper.scrape(&result.link))).await;

            for (result, page) in fresh.into_iter().zip(pages) {
                content.sources.push(result.link.clone());
                if page.is_empty() {
                    tracing::debug!(link = %result.link, "Scrape empty, using snippet");
                    content.sections.push(result.fallback_text());
                } else {
                    content.sections.push(page);
                }
            }

            let words = content.word_count();
            if words >= limits.min_words {
                tracing::debug!(words, sources = content.sources.len(), "Word target reached");
                return content;
            }
        }

        tracing::debug!(
            words = content.word_count(),
            sources = content.sources.len(),
            "Aggregation exhausted results"
        );
        content
    }
}
