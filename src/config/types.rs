use clap::ValueEnum;
use std::path::PathBuf;
use url::Url;

/// Product token used for robots.txt matching.
///
/// The wire user agent is longer (see [`default_user_agent`]); robots rules
/// are matched against this short token, which is also its first word.
pub const CRAWLER_NAME: &str = "docmirror";

/// Full user agent string sent with every request
pub fn default_user_agent() -> String {
    format!(
        "{}/{} (+https://github.com/docmirror/docmirror)",
        CRAWLER_NAME,
        env!("CARGO_PKG_VERSION")
    )
}

/// How page URLs are discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiscoveryMethod {
    /// Probe the conventional sitemap locations, fall back to recursive
    Auto,
    /// Follow links from the base URL
    Recursive,
    /// Use an explicitly supplied sitemap URL
    Sitemap,
}

/// Validated configuration for one crawl run.
///
/// Read-only once the run starts; the crawler never mutates it.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Base documentation URL; its host bounds the crawl scope
    pub base_url: Url,

    /// Directory the Markdown tree is written to
    pub output_dir: PathBuf,

    /// Discovery strategy
    pub method: DiscoveryMethod,

    /// Explicit sitemap URL, required when `method` is `Sitemap`
    pub sitemap_url: Option<Url>,

    /// Politeness delay between requests, in seconds
    pub delay: f64,

    /// Page budget; unlimited when `None`
    pub max_pages: Option<usize>,

    /// Whether robots.txt rules are honored
    pub respect_robots: bool,

    /// User agent string sent with every request
    pub user_agent: String,
}

impl CrawlConfig {
    /// Host component of the base URL
    pub fn base_host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }
}
