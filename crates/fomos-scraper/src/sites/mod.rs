//! Per-storefront search page extractors.
//!
//! Each site module pairs a [`SourceExtractor`](crate::SourceExtractor)
//! implementation with a pure `parse_listing` function over the page HTML, so
//! selector logic can be tested against fixtures without a network.

mod amazon;
mod jiomart;
mod snapdeal;

use std::sync::Arc;

use scraper::{ElementRef, Selector};

use crate::client::{absolutize, PageClient};
use crate::error::ScraperError;

pub use amazon::Amazon;
pub use jiomart::Jiomart;
pub use snapdeal::Snapdeal;

/// Search endpoint shared by every site extractor.
pub struct SearchPage {
    name: String,
    search_url: String,
    client: Arc<PageClient>,
}

impl SearchPage {
    #[must_use]
    pub fn new(name: &str, search_url: &str, client: Arc<PageClient>) -> Self {
        Self {
            name: name.to_owned(),
            search_url: search_url.to_owned(),
            client,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetches the result page for `query`, returning `(page_url, html)`.
    pub(crate) async fn fetch(&self, query: &str) -> Result<(String, String), ScraperError> {
        let url = PageClient::search_url(&self.search_url, query);
        let html = self.client.fetch_html(&url).await?;
        Ok((url, html))
    }
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Trimmed text of the first match under `scope`, if non-empty.
pub(crate) fn text_of(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

/// Trimmed attribute value of the first match under `scope` that carries it.
pub(crate) fn attr_of(scope: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    scope
        .select(sel)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Absolute link for `href`, or the search page itself when there is none.
pub(crate) fn link_or_search_page(page_url: &str, href: Option<String>) -> String {
    href.map_or_else(|| page_url.to_owned(), |h| absolutize(page_url, &h))
}

/// First URL of a `srcset` list (`"a.jpg 1x, b.jpg 2x"` → `"a.jpg"`).
pub(crate) fn first_srcset_url(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[test]
    fn text_of_skips_empty_matches_and_collapses_whitespace() {
        let doc = Html::parse_fragment(
            "<div><span class='t'>  </span><span class='t'>Wireless\n   Mouse  X1</span></div>",
        );
        let text = text_of(doc.root_element(), &selector(".t"));
        assert_eq!(text.as_deref(), Some("Wireless Mouse X1"));
    }

    #[test]
    fn attr_of_returns_first_non_empty_value() {
        let doc = Html::parse_fragment("<div><img src=''><img src=' /a.jpg '></div>");
        assert_eq!(
            attr_of(doc.root_element(), &selector("img"), "src").as_deref(),
            Some("/a.jpg")
        );
    }

    #[test]
    fn link_or_search_page_falls_back() {
        assert_eq!(
            link_or_search_page("https://www.snapdeal.com/search?keyword=x", None),
            "https://www.snapdeal.com/search?keyword=x"
        );
        assert_eq!(
            link_or_search_page("https://www.snapdeal.com/search?keyword=x", Some("/p/1".into())),
            "https://www.snapdeal.com/p/1"
        );
    }

    #[test]
    fn first_srcset_url_takes_leading_candidate() {
        assert_eq!(
            first_srcset_url("https://a.test/1.webp 1x, https://a.test/2.webp 2x"),
            Some("https://a.test/1.webp")
        );
        assert_eq!(first_srcset_url("  "), None);
    }
}
