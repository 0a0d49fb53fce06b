//! Robots.txt handling
//!
//! The robots policy is loaded once at crawl start and immutable afterwards.
//! A failed load is non-fatal: the crawler logs a warning and proceeds
//! permissively, matching common crawler behavior for absent robots files.

mod parser;

pub use parser::RobotsPolicy;

use crate::crawler::fetcher::{fetch_text, PROBE_TIMEOUT};
use reqwest::Client;
use url::Url;

/// Fetches and parses robots.txt for the host of `base_url`.
///
/// Returns `None` when the file cannot be fetched; absence of a policy means
/// every URL is allowed.
pub async fn load_robots(client: &Client, base_url: &Url) -> Option<RobotsPolicy> {
    let robots_url = match base_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot derive robots.txt URL from {}: {}", base_url, e);
            return None;
        }
    };

    match fetch_text(client, &robots_url, PROBE_TIMEOUT).await {
        Ok(content) => {
            tracing::info!("Loaded robots.txt from {}", robots_url);
            Some(RobotsPolicy::from_content(&content))
        }
        Err(e) => {
            tracing::warn!(
                "Could not load robots.txt: {}. Continuing without robots rules.",
                e
            );
            None
        }
    }
}
