//! URL handling for docmirror
//!
//! This module decides which discovered URLs are part of the documentation
//! being mirrored. The scope test is a pure predicate over a normalized URL:
//! same host as the base URL, not a static asset, fragment-free, and allowed
//! by the robots policy when one is loaded.

mod normalize;

pub use normalize::{normalize_url, resolve_link};

use crate::robots::RobotsPolicy;
use crate::UrlError;
use url::Url;

/// Path extensions that never point at a documentation page
const STATIC_ASSET_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".pdf", ".zip", ".css", ".js", ".ico", ".xml", ".json",
    ".svg", ".woff", ".woff2", ".ttf", ".eot",
];

/// Decides whether a URL belongs to the crawl.
///
/// Built once per run from the base URL and the (optional) robots policy;
/// both are immutable afterwards, so the filter is a deterministic predicate:
/// the same URL always gets the same answer.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    base_host: String,
    base_port: Option<u16>,
    robots: Option<RobotsPolicy>,
    robots_token: String,
}

impl ScopeFilter {
    /// Creates a filter scoped to the host of `base_url`
    pub fn new(
        base_url: &Url,
        robots: Option<RobotsPolicy>,
        robots_token: impl Into<String>,
    ) -> Result<Self, UrlError> {
        let base_host = base_url.host_str().ok_or(UrlError::MissingHost)?.to_string();
        Ok(Self {
            base_host,
            base_port: base_url.port(),
            robots,
            robots_token: robots_token.into(),
        })
    }

    /// Returns true if the URL should be crawled.
    ///
    /// All of the following must hold:
    /// - the URL uses http or https
    /// - its host (and port) equal the base exactly; subdomains are out
    /// - its path does not end in a known static-asset extension
    /// - it carries no fragment
    /// - the robots policy allows it, or no policy is loaded
    pub fn is_in_scope(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        if url.host_str() != Some(self.base_host.as_str()) || url.port() != self.base_port {
            return false;
        }

        let path = url.path().to_lowercase();
        if STATIC_ASSET_EXTENSIONS
            .iter()
            .any(|ext| path.ends_with(ext))
        {
            return false;
        }

        if url.fragment().is_some() {
            return false;
        }

        match &self.robots {
            Some(policy) => policy.is_allowed(url.as_str(), &self.robots_token),
            None => true,
        }
    }
}
