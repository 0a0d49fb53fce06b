//! Sitemap resolution
//!
//! Expands a sitemap URL into a flat, filtered, ordered list of page URLs.
//! A sitemap index is expanded one level deep: each child is fetched and
//! parsed as a leaf sitemap, and a failing child is logged and skipped
//! without aborting the resolution. The streaming reader matches elements
//! by local name, so sitemaps work regardless of which namespace prefix
//! their generator emitted.

use crate::crawler::fetcher::{fetch_text, is_reachable, PROBE_TIMEOUT};
use crate::url::ScopeFilter;
use crate::SitemapError;
use ::sitemap::reader::{SiteMapEntity, SiteMapReader};
use reqwest::Client;
use std::io::Cursor;
use url::Url;

/// Conventional sitemap locations probed in order by auto-detection
pub const CONVENTIONAL_SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/wp-sitemap.xml",
    "/sitemap/sitemap.xml",
    "/sitemaps/sitemap.xml",
];

/// One parsed sitemap document: an index pointing at child sitemaps, or a
/// leaf listing pages. The tree is transient; resolution flattens it.
enum SitemapNode {
    Index(Vec<Url>),
    Leaf(Vec<Url>),
}

/// Probes the conventional sitemap paths and returns the first reachable one
pub async fn detect_sitemap(client: &Client, base_url: &Url) -> Option<Url> {
    for location in CONVENTIONAL_SITEMAP_PATHS {
        let Ok(candidate) = base_url.join(location) else {
            continue;
        };
        if is_reachable(client, &candidate).await {
            tracing::info!("Found sitemap at: {}", candidate);
            return Some(candidate);
        }
    }
    None
}

/// Resolves a sitemap (or sitemap index) into the list of pages to crawl.
///
/// URLs are emitted in document order, child sitemaps in the order the index
/// lists them. Every URL must pass the scope filter; duplicates are not
/// removed here, the frontier's visited set deduplicates downstream. When a
/// page budget is set the list is truncated to the first N entries after
/// filtering.
pub async fn resolve_sitemap(
    client: &Client,
    sitemap_url: &Url,
    filter: &ScopeFilter,
    max_pages: Option<usize>,
) -> Result<Vec<Url>, SitemapError> {
    let xml = fetch_text(client, sitemap_url, PROBE_TIMEOUT)
        .await
        .map_err(|e| SitemapError::Fetch {
            url: sitemap_url.to_string(),
            reason: e.to_string(),
        })?;

    let root = parse_sitemap(&xml).map_err(|reason| SitemapError::Parse {
        url: sitemap_url.to_string(),
        reason,
    })?;

    let pages = match root {
        SitemapNode::Leaf(urls) => urls,
        SitemapNode::Index(children) => {
            tracing::info!("Found sitemap index with {} sitemaps", children.len());
            let mut pages = Vec::new();
            for child in children {
                match resolve_child(client, &child).await {
                    Ok(urls) => pages.extend(urls),
                    Err(reason) => {
                        tracing::warn!("Skipping sitemap {}: {}", child, reason);
                    }
                }
            }
            pages
        }
    };

    let mut filtered: Vec<Url> = pages.into_iter().filter(|u| filter.is_in_scope(u)).collect();

    if filtered.is_empty() {
        return Err(SitemapError::NoUrls);
    }

    tracing::info!("Found {} pages to process", filtered.len());

    if let Some(limit) = max_pages {
        if filtered.len() > limit {
            tracing::info!("Limiting to the first {} sitemap entries", limit);
            filtered.truncate(limit);
        }
    }

    Ok(filtered)
}

/// Fetches and parses one child of a sitemap index.
///
/// Children are expected to be leaf sitemaps; a nested index is not expanded
/// further, only its directly listed pages (if any) are kept.
async fn resolve_child(client: &Client, child_url: &Url) -> Result<Vec<Url>, String> {
    tracing::info!("Fetching sitemap: {}", child_url);

    let xml = fetch_text(client, child_url, PROBE_TIMEOUT)
        .await
        .map_err(|e| e.to_string())?;

    match parse_sitemap(&xml)? {
        SitemapNode::Leaf(urls) => Ok(urls),
        SitemapNode::Index(_) => {
            tracing::warn!("Nested sitemap index at {} is not expanded", child_url);
            Ok(Vec::new())
        }
    }
}

/// Parses one sitemap document.
///
/// Entries collected before a malformed trailing section are kept; a
/// document yielding no entries and an XML error is rejected as not
/// well-formed. A well-formed document with zero entries parses as an empty
/// leaf and surfaces as `NoUrls` after filtering.
fn parse_sitemap(xml: &str) -> Result<SitemapNode, String> {
    let reader = SiteMapReader::new(Cursor::new(xml.as_bytes()));

    let mut pages = Vec::new();
    let mut children = Vec::new();
    let mut xml_error = None;

    for entity in reader {
        match entity {
            SiteMapEntity::Url(entry) => {
                if let Some(loc) = entry.loc.get_url() {
                    pages.push(loc);
                }
            }
            SiteMapEntity::SiteMap(entry) => {
                if let Some(loc) = entry.loc.get_url() {
                    children.push(loc);
                }
            }
            SiteMapEntity::Err(e) => {
                xml_error = Some(e.to_string());
            }
        }
    }

    if pages.is_empty() && children.is_empty() {
        if let Some(error) = xml_error {
            return Err(error);
        }
    } else if let Some(error) = xml_error {
        tracing::warn!("Ignoring trailing XML error in sitemap: {}", error);
    }

    if !children.is_empty() {
        Ok(SitemapNode::Index(children))
    } else {
        Ok(SitemapNode::Leaf(pages))
    }
}
