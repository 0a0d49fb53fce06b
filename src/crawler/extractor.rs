//! Content extraction
//!
//! Turns a fetched HTML document into the piece worth keeping: the page
//! title, the main-content subtree, and the outbound links found inside it.
//! Boilerplate (navigation, footers, scripts, sidebars) is removed from a
//! working copy first, so link harvesting never sees chrome links.

use crate::url::{resolve_link, ScopeFilter};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements that never contain documentation content
const BOILERPLATE_SELECTOR: &str =
    "nav, footer, script, style, header, .header, .footer, .navigation, .sidebar, .menu, .comments";

/// Candidate content containers, most specific landmark first.
///
/// Evaluated in order; the first selector with a match wins. The list covers
/// the HTML5 landmarks plus the container class/id names documentation
/// generators commonly emit.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    ".content",
    "#content",
    ".documentation",
    ".doc-content",
    ".markdown-body",
];

/// Result of extracting one page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Page title, never empty (falls back to the URL path)
    pub title: String,

    /// Serialized HTML of the content root
    pub content_html: String,

    /// In-scope links found inside the content root, in document order
    pub links: Vec<Url>,
}

/// Extracts title, main content and outbound links from an HTML document.
///
/// Never fails: a page without a recognizable content container degrades to
/// the whole boilerplate-stripped document rather than being dropped.
pub fn extract(html: &str, page_url: &Url, filter: &ScopeFilter) -> ExtractedPage {
    let mut document = Html::parse_document(html);

    strip_boilerplate(&mut document);

    let title = extract_title(&document, page_url);

    let content_root = find_content_root(&document);
    let content_html = content_root
        .map(|el| el.html())
        .unwrap_or_else(|| document.root_element().html());

    let link_scope = content_root.unwrap_or_else(|| document.root_element());
    let links = extract_links(link_scope, page_url, filter);

    ExtractedPage {
        title,
        content_html,
        links,
    }
}

/// Detaches boilerplate elements from the parsed document
fn strip_boilerplate(document: &mut Html) {
    let selector = Selector::parse(BOILERPLATE_SELECTOR).expect("valid boilerplate selector");

    let doomed: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Title element text, whitespace-collapsed, or the URL path
fn extract_title(document: &Html, page_url: &Url) -> String {
    let selector = Selector::parse("title").expect("valid title selector");

    document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| page_url.path().to_string())
}

/// First element matching the content selectors, in priority order
fn find_content_root(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_SELECTORS.iter().find_map(|candidate| {
        let selector = Selector::parse(candidate).expect("valid content selector");
        document.select(&selector).next()
    })
}

/// Collects in-scope anchor targets inside `scope`, deduplicated in document order
fn extract_links(scope: ElementRef<'_>, page_url: &Url, filter: &ScopeFilter) -> Vec<Url> {
    let selector = Selector::parse("a[href]").expect("valid anchor selector");

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in scope.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(page_url, href) else {
            continue;
        };
        if filter.is_in_scope(&url) && seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
