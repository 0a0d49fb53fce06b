//! Crawl engine
//!
//! The pieces of the fetch -> extract -> convert -> save -> enqueue cycle:
//!
//! - [`fetcher`]: HTTP client and fetch primitives
//! - [`extractor`]: boilerplate stripping, content-root selection, link harvest
//! - [`processor`]: per-page fetch/extract/convert pipeline
//! - [`frontier`]: visited/pending sets and scheduling
//! - [`coordinator`]: the crawl loop tying it all together

mod coordinator;
pub mod extractor;
pub mod fetcher;
mod frontier;
mod processor;

pub use coordinator::Crawler;
pub use extractor::ExtractedPage;
pub use fetcher::build_http_client;
pub use frontier::{Frontier, FrontierState};
pub use processor::{process_page, PageResult};
