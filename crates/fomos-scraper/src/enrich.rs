//! Attaches matching signals to raw listings.

use futures::stream::{self, StreamExt};

use fomos_core::{normalize_title, EnrichedProduct, RawProduct};

use crate::fingerprint::Fingerprinter;

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Maximum number of image fetches in flight at once.
    pub max_concurrent: usize,
    /// When `false`, images are not fetched and the raw image URL is used as
    /// the fingerprint.
    pub fingerprint_images: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            fingerprint_images: true,
        }
    }
}

/// Normalizes titles and fingerprints images for a batch of listings.
///
/// Output has the same length and order as `products`. Fetches run
/// concurrently up to [`EnrichOptions::max_concurrent`] but results are
/// re-sequenced before returning. A failed image never affects other items:
/// the fingerprinter substitutes a fallback instead of erroring.
pub async fn enrich_all<F>(
    fingerprinter: &F,
    products: Vec<RawProduct>,
    options: &EnrichOptions,
) -> Vec<EnrichedProduct>
where
    F: Fingerprinter + ?Sized,
{
    let total = products.len();
    let enriched: Vec<EnrichedProduct> = stream::iter(products)
        .map(|raw| enrich_one(fingerprinter, raw, options.fingerprint_images))
        .buffered(options.max_concurrent.max(1))
        .collect()
        .await;

    tracing::debug!(
        total,
        fallbacks = enriched
            .iter()
            .filter(|p| p.image_fingerprint.starts_with(crate::FALLBACK_PREFIX))
            .count(),
        "enriched product batch"
    );

    enriched
}

async fn enrich_one<F>(fingerprinter: &F, raw: RawProduct, fingerprint_images: bool) -> EnrichedProduct
where
    F: Fingerprinter + ?Sized,
{
    let normalized_title = normalize_title(&raw.title);
    let image_fingerprint = if fingerprint_images {
        fingerprinter.fingerprint(&raw.image_url).await.into_string()
    } else {
        raw.image_url.clone()
    };
    EnrichedProduct::new(raw, normalized_title, image_fingerprint)
}
