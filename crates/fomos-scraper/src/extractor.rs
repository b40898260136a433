//! The producer interface every storefront implements.

use std::sync::Arc;

use async_trait::async_trait;

use fomos_core::{RawProduct, SiteKind, SourceSpec};

use crate::client::PageClient;
use crate::error::ScraperError;
use crate::sites::{Amazon, Jiomart, SearchPage, Snapdeal};

/// Produces raw listings for a search query from one site.
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Display name stamped on this source's listings.
    fn name(&self) -> &str;

    /// Runs one search and returns every listing on the result page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] when the page cannot be fetched. An empty
    /// result page is `Ok(vec![])`, not an error.
    async fn extract(&self, query: &str) -> Result<Vec<RawProduct>, ScraperError>;
}

/// Instantiates one extractor per enabled source, preserving declaration order.
#[must_use]
pub fn build_extractors(
    specs: &[SourceSpec],
    client: &Arc<PageClient>,
) -> Vec<Box<dyn SourceExtractor>> {
    specs
        .iter()
        .filter(|spec| {
            if !spec.enabled {
                tracing::info!(source = %spec.name, "source disabled, skipping");
            }
            spec.enabled
        })
        .map(|spec| {
            let page = SearchPage::new(&spec.name, &spec.search_url, Arc::clone(client));
            let extractor: Box<dyn SourceExtractor> = match spec.kind {
                SiteKind::Jiomart => Box::new(Jiomart::new(page)),
                SiteKind::Amazon => Box::new(Amazon::new(page)),
                SiteKind::Snapdeal => Box::new(Snapdeal::new(page)),
            };
            extractor
        })
        .collect()
}
