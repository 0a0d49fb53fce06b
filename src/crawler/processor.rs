//! Page processing
//!
//! One URL in, one [`PageResult`] out: fetch, extract the main content,
//! convert it to Markdown and normalize the converter's output. Persistence
//! stays with the caller, so processing has no filesystem side effects.

use crate::crawler::extractor::{self, ExtractedPage};
use crate::crawler::fetcher::fetch_page;
use crate::url::ScopeFilter;
use crate::PageError;
use reqwest::Client;
use url::Url;

/// Converted page handed back to the crawl loop
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Page title for the front-matter block
    pub title: String,

    /// Markdown body
    pub markdown: String,

    /// In-scope links discovered inside the content root
    pub outbound_links: Vec<Url>,
}

/// Fetches and converts a single page.
///
/// Transport failures and bad statuses surface as `Err` (single attempt, no
/// retry). A Markdown conversion failure does not drop the page: the result
/// carries a placeholder body naming the error, so the page is still
/// recorded as visited and never retried.
pub async fn process_page(
    client: &Client,
    url: &Url,
    filter: &ScopeFilter,
) -> Result<PageResult, PageError> {
    let body = fetch_page(client, url).await?;

    let ExtractedPage {
        title,
        content_html,
        links,
    } = extractor::extract(&body, url, filter);

    let markdown = match htmd::convert(&content_html) {
        Ok(markdown) => collapse_blank_lines(&markdown),
        Err(e) => {
            tracing::error!("Markdown conversion error for {}: {}", url, e);
            conversion_fallback(url, &e.to_string())
        }
    };

    Ok(PageResult {
        title,
        markdown,
        outbound_links: links,
    })
}

/// Placeholder body used when the converter rejects a page
fn conversion_fallback(url: &Url, error: &str) -> String {
    format!("Error converting content: {}\n\nOriginal URL: {}\n", error, url)
}

/// Collapses runs of three or more newlines to exactly two.
///
/// Converters tend to leave stacked blank lines where boilerplate elements
/// were removed; two newlines (one blank line) is the Markdown paragraph
/// separator, so nothing is lost.
fn collapse_blank_lines(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut newlines = 0usize;

    for ch in markdown.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(ch);
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }

    out
}
