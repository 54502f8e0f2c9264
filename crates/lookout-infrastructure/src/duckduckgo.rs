//! DuckDuckGo HTML search provider.

use std::time::Duration;

use async_trait::async_trait;
use lookout_core::{LookoutError, Result};
use lookout_core::search::{SearchProvider, SearchResult};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::http::{build_client, describe_error};

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Scrapes the DuckDuckGo HTML results page.
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: SEARCH_URL.to_string(),
        })
    }

    /// Overrides the results page URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|err| LookoutError::http(describe_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookoutError::http_status(
                status.as_u16(),
                format!("search endpoint returned {status}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|err| LookoutError::http(format!("failed to read body: {err}")))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.fetch(query).await {
            Ok(body) => parse_results(&body),
            Err(err) => {
                tracing::warn!(query = %query, "Search failed: {}", err);
                Vec::new()
            }
        }
    }
}

/// Extracts results from a results page.
///
/// Blocks missing either a title link or a snippet are skipped; `id` keeps the
/// block's position on the page.
pub fn parse_results(body: &str) -> Vec<SearchResult> {
    let (Ok(result_sel), Ok(title_sel), Ok(snippet_sel)) = (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse("a.result__snippet"),
    ) else {
        return Vec::new();
    };

    let doc = Html::parse_document(body);
    let mut results = Vec::new();

    for (id, block) in doc.select(&result_sel).enumerate() {
        let Some(title_el) = block.select(&title_sel).next() else {
            continue;
        };
        let Some(snippet_el) = block.select(&snippet_sel).next() else {
            continue;
        };
        let Some(href) = title_el.value().attr("href") else {
            continue;
        };

        results.push(SearchResult {
            id,
            link: resolve_link(href),
            title: title_el.text().collect::<String>(),
            snippet: snippet_el.text().collect::<String>().trim().to_string(),
        });
    }

    results
}

/// Unwraps `//duckduckgo.com/l/?uddg=<encoded>` redirect links.
pub fn resolve_link(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
          <div class="result results_links">
            <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fblog.rust-lang.org%2Freleases&amp;rut=abc">Rust <b>Releases</b></a></h2>
            <a class="result__snippet" href="#">  The latest Rust release notes.  </a>
          </div>
          <div class="result">
            <h2><a class="result__a" href="https://example.com/no-snippet">No snippet</a></h2>
          </div>
          <div class="result">
            <h2><a class="result__a" href="https://example.org/page">Example</a></h2>
            <a class="result__snippet" href="#">Example snippet</a>
          </div>
        </body></html>
    "##;

    #[test]
    fn test_parse_results_skips_incomplete_blocks() {
        let results = parse_results(PAGE);
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].id, 0);
        assert_eq!(results[0].link, "https://blog.rust-lang.org/releases");
        assert_eq!(results[0].title, "Rust Releases");
        assert_eq!(results[0].snippet, "The latest Rust release notes.");

        assert_eq!(results[1].id, 2);
        assert_eq!(results[1].link, "https://example.org/page");
    }

    #[test]
    fn test_parse_results_empty_page() {
        assert!(parse_results("<html><body>No results.</body></html>").is_empty());
    }

    #[test]
    fn test_resolve_link_passthrough() {
        assert_eq!(resolve_link("https://example.com/a?b=c"), "https://example.com/a?b=c");
        assert_eq!(resolve_link("not a url"), "not a url");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_no_results() {
        let provider = DuckDuckGoSearch::new(Duration::from_millis(200))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/html/");
        assert!(provider.search("rust").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_http_error() {
        let provider = DuckDuckGoSearch::new(Duration::from_millis(200))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/html/");
        let err = provider.fetch("rust").await.unwrap_err();
        assert!(err.is_http());
        assert!(err.to_string().starts_with("HTTP error: "));
    }
}
