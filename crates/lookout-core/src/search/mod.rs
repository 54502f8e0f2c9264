//! Web search grounding.
//!
//! - [`model`]: search result records and the aggregation output
//! - [`service`]: search provider and page scraper contracts
//! - [`aggregator`]: multi-query search with batched scraping and merging

pub mod aggregator;
pub mod model;
pub mod service;

pub use aggregator::ContentAggregator;
pub use model::{AggregatedContent, SearchResult};
pub use service::{PageScraper, SearchProvider};
