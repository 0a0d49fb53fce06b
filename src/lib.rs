//! docmirror: a documentation site mirror
//!
//! This crate implements a polite web crawler that downloads a documentation
//! website and converts each page's main content to Markdown, preserving the
//! site's directory structure on disk. Pages are discovered either from a
//! sitemap (including sitemap indexes) or by following links recursively.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for docmirror operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL in configuration: {0}")]
    InvalidUrl(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while resolving a sitemap into a page list.
///
/// `Fetch` and `Parse` are fatal for the document they name; a failing child
/// sitemap of an index is logged and skipped by the resolver instead.
/// `NoUrls` signals that sitemap discovery is unusable for this host and the
/// caller should fall back to link-following.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Sitemap {url} is not well-formed XML: {reason}")]
    Parse { url: String, reason: String },

    #[error("No URLs in the sitemap survived filtering")]
    NoUrls,
}

/// Page-level failures.
///
/// These never propagate past the page processor boundary: the crawl loop
/// logs them and moves on. The URL still counts as visited, so a failing
/// page is never retried within a run.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors raised while persisting converted pages
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for docmirror operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CrawlConfig, DiscoveryMethod};
pub use crawler::Crawler;
pub use output::CrawlStats;
pub use robots::RobotsPolicy;
