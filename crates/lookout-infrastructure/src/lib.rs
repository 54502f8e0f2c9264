//! HTTP-backed search collaborators.

pub mod duckduckgo;
pub mod http;
pub mod page_scraper;

pub use duckduckgo::DuckDuckGoSearch;
pub use page_scraper::HttpPageScraper;
