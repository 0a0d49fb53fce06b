//! HTTP fetching
//!
//! One shared reqwest client serves the whole run. Page fetches use the
//! client's 30 second default timeout; robots, sitemap and reachability
//! probes use a shorter per-request override so a slow host cannot stall
//! discovery for long.

use crate::PageError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Timeout for page fetches
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for robots.txt, sitemap and reachability requests
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client used for the whole crawl run
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(PAGE_TIMEOUT)
        .connect_timeout(PROBE_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body as text.
///
/// Any status outside 2xx/3xx is a failure; there is no retry. Redirects are
/// followed by the client, so a 3xx here means a redirect that could not be
/// followed.
pub async fn fetch_text(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<String, PageError> {
    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() && !status.is_redirection() {
        return Err(PageError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Fetches a documentation page with the standard page timeout
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, PageError> {
    fetch_text(client, url, PAGE_TIMEOUT).await
}

/// Lightweight reachability check used for sitemap probing.
///
/// Sends HEAD first; some servers reject HEAD with 405, in which case the
/// check is retried as GET. Any 2xx/3xx status counts as reachable.
pub async fn is_reachable(client: &Client, url: &Url) -> bool {
    match client
        .head(url.clone())
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(response) if response.status() != StatusCode::METHOD_NOT_ALLOWED => {
            let status = response.status();
            return status.is_success() || status.is_redirection();
        }
        Ok(_) => {} // 405: fall through to GET
        Err(_) => return false,
    }

    match client.get(url.clone()).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => {
            let status = response.status();
            status.is_success() || status.is_redirection()
        }
        Err(_) => false,
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> PageError {
    if error.is_timeout() {
        PageError::Timeout {
            url: url.to_string(),
        }
    } else {
        PageError::Transport {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
