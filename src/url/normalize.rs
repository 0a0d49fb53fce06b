use crate::UrlError;
use url::Url;

/// Normalizes a URL string into a crawl target.
///
/// A crawl target is always an absolute http(s) URL with a host and no
/// fragment; set membership in the visited and pending sets relies on this
/// canonical form so equal pages compare equal by value.
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "only http and https are supported, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    // Same-page anchors are never distinct targets
    url.set_fragment(None);

    Ok(url)
}

/// Resolves an anchor href against the page it appeared on.
///
/// Returns `None` for hrefs that can never become crawl targets: empty
/// strings, fragment-only anchors, `javascript:`/`mailto:`/`tel:`/`data:`
/// pseudo-links, unparseable values, and anything that does not resolve to
/// http(s).
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
