//! Page fetching and text extraction.

use std::time::Duration;

use async_trait::async_trait;
use lookout_core::{LookoutError, Result};
use lookout_core::search::PageScraper;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};

use crate::http::{build_client, describe_error};

/// Fetches pages over HTTP and keeps their paragraph text.
#[derive(Clone)]
pub struct HttpPageScraper {
    client: Client,
}

impl HttpPageScraper {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|err| LookoutError::http(describe_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookoutError::http_status(
                status.as_u16(),
                format!("page returned {status}"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        if !content_type.contains("text/html") && !content_type.contains("text/plain") {
            return Err(LookoutError::http(format!(
                "unsupported content type: {content_type}"
            )));
        }

        response
            .text()
            .await
            .map_err(|err| LookoutError::http(format!("failed to read body: {err}")))
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    async fn scrape(&self, url: &str) -> String {
        match self.fetch(url).await {
            Ok(body) => extract_text(&body),
            Err(err) => {
                tracing::debug!(url = %url, "Scrape failed: {}", err);
                String::new()
            }
        }
    }
}

/// Extracts readable text from an HTML document.
///
/// Paragraphs inside `<article>` or `<main>` win when they exist; otherwise all
/// `<p>` elements are used. Whitespace is collapsed.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    for region in ["article p", "main p", "p"] {
        let Ok(selector) = Selector::parse(region) else {
            continue;
        };
        let paragraphs: Vec<String> = doc
            .select(&selector)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join(" ");
        }
    }

    String::new()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_article_paragraphs() {
        let html = r#"
            <html><body>
              <nav><p>Menu item</p></nav>
              <article>
                <p>First   paragraph
                   of the story.</p>
                <p>Second paragraph.</p>
              </article>
            </body></html>
        "#;
        assert_eq!(
            extract_text(html),
            "First paragraph of the story. Second paragraph."
        );
    }

    #[test]
    fn test_falls_back_to_all_paragraphs() {
        let html = "<html><body><p>One.</p><div><p>Two.</p></div></body></html>";
        assert_eq!(extract_text(html), "One. Two.");
    }

    #[test]
    fn test_no_paragraphs_is_empty() {
        assert_eq!(extract_text("<html><body><div>loose text</div></body></html>"), "");
    }

    #[tokio::test]
    async fn test_unreachable_page_scrapes_empty() {
        let scraper = HttpPageScraper::new(Duration::from_millis(200)).unwrap();
        assert_eq!(scraper.scrape("http://127.0.0.1:9/missing").await, "");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_http_error() {
        let scraper = HttpPageScraper::new(Duration::from_millis(200)).unwrap();
        let err = scraper.fetch("http://127.0.0.1:9/missing").await.unwrap_err();
        assert!(err.is_http());
    }
}
