//! Link resolution and request-header helpers for storefront pages.

use reqwest::Url;

/// The `Referer` a browser sends when searching from the site's home page:
/// the page origin with a trailing slash, e.g. `"https://www.amazon.in/"`.
pub(super) fn home_referer(page: &Url) -> String {
    format!("{}/", page.origin().ascii_serialization())
}

/// Host named in rate-limit errors; the bare authority for IP-literal hosts.
pub(super) fn site_host(page: &Url) -> String {
    match (page.host_str(), page.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_owned(),
        (None, _) => page.as_str().to_owned(),
    }
}

/// Resolves `href` against `page_url`.
///
/// Absolute links pass through, protocol-relative links inherit the page's
/// scheme, and paths are joined onto the page. Returns `href` unchanged if
/// either side fails to parse.
#[must_use]
pub fn absolutize(page_url: &str, href: &str) -> String {
    let href = href.trim();
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map_or_else(|_| href.to_owned(), |u| u.to_string())
}
