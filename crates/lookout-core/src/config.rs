//! Runtime configuration.
//!
//! There is no configuration file. The binary fills [`LookoutConfig`] from
//! command-line flags and environment variables; everything else uses
//! [`LookoutConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LookoutError, Result};

pub const DEFAULT_MODEL: &str = "llama3.2:1b";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_CONTEXT_CHAR_LIMIT: usize = 12_000;

/// Limits applied by the content aggregator to a single aggregation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationLimits {
    /// Number of results scraped between word-count checks.
    pub batch_size: usize,
    /// Merged word count at which aggregation stops early.
    pub min_words: usize,
    /// Results at list positions at or beyond this are never considered.
    pub hard_page_limit: usize,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            batch_size: 10,
            min_words: 500,
            hard_page_limit: 10,
        }
    }
}

/// Top-level configuration shared by every layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookoutConfig {
    /// Model name passed to the chat backend.
    pub model: String,
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Silence required before a background result may be rendered.
    pub idle_wait: Duration,
    /// Sleep between deep-queue polls when the queue is empty.
    pub deep_poll_interval: Duration,
    /// Timeout for one search endpoint request.
    pub search_timeout: Duration,
    /// Timeout for one page fetch.
    pub scrape_timeout: Duration,
    /// Character cap on aggregated content injected into a grounded prompt.
    pub context_char_limit: usize,
    pub aggregation: AggregationLimits,
}

impl Default for LookoutConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            idle_wait: Duration::from_secs(5),
            deep_poll_interval: Duration::from_secs(2),
            search_timeout: Duration::from_secs(10),
            scrape_timeout: Duration::from_secs(12),
            context_char_limit: DEFAULT_CONTEXT_CHAR_LIMIT,
            aggregation: AggregationLimits::default(),
        }
    }
}

impl LookoutConfig {
    /// Rejects settings that would make the assistant loop or send nothing.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(LookoutError::config("model name must not be empty"));
        }
        if self.ollama_url.trim().is_empty() {
            return Err(LookoutError::config("Ollama URL must not be empty"));
        }
        if self.aggregation.batch_size == 0 {
            return Err(LookoutError::config("search batch size must be at least 1"));
        }
        if self.aggregation.hard_page_limit == 0 {
            return Err(LookoutError::config("hard page limit must be at least 1"));
        }
        if self.deep_poll_interval.is_zero() {
            return Err(LookoutError::config(
                "deep queue poll interval must be greater than zero",
            ));
        }
        Ok(())
    }
}
