//! Search domain models.

use serde::{Deserialize, Serialize};

/// A single search hit, in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Position of the hit within its provider response.
    pub id: usize,
    pub link: String,
    pub title: String,
    pub snippet: String,
}

impl SearchResult {
    /// Degraded page text used when the page itself cannot be scraped.
    pub fn fallback_text(&self) -> String {
        format!("{}. {}", self.title, self.snippet)
    }
}

/// Merged page text from one aggregation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedContent {
    /// Extracted texts, in the order their results were considered.
    pub sections: Vec<String>,
    /// Distinct links visited, in first-seen order.
    pub sources: Vec<String>,
}

impl AggregatedContent {
    /// Sections joined by blank lines.
    pub fn text(&self) -> String {
        self.sections.join("\n\n")
    }

    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }

    /// True when there is nothing to ground an answer on.
    pub fn is_blank(&self) -> bool {
        self.sections.iter().all(|section| section.trim().is_empty())
    }
}
