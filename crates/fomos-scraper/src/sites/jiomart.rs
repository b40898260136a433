use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};

use fomos_core::products::{NOT_RATED, NO_IMAGE, NO_REVIEWS};
use fomos_core::RawProduct;

use super::{attr_of, link_or_search_page, selector, text_of, SearchPage};
use crate::client::absolutize;
use crate::error::ScraperError;
use crate::extractor::SourceExtractor;

static CARD: LazyLock<Selector> = LazyLock::new(|| selector(".ais-InfiniteHits-item"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".plp-card-details-name"));
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector(".plp-card-details-price span.jm-heading-xxs"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector(".plp-card-image img"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.plp-card-wrapper"));

pub struct Jiomart {
    page: SearchPage,
}

impl Jiomart {
    #[must_use]
    pub fn new(page: SearchPage) -> Self {
        Self { page }
    }
}

#[async_trait]
impl SourceExtractor for Jiomart {
    fn name(&self) -> &str {
        self.page.name()
    }

    async fn extract(&self, query: &str) -> Result<Vec<RawProduct>, ScraperError> {
        let (page_url, html) = self.page.fetch(query).await?;
        let products = parse_listing(&html, self.page.name(), &page_url);
        tracing::debug!(source = self.page.name(), count = products.len(), "parsed jiomart listing");
        Ok(products)
    }
}

/// Extracts the infinite-hits product cards from a Jiomart search page.
///
/// Jiomart lazy-loads images, so `data-src` carries the real URL and `src` is
/// only used when it is absent. The listing exposes no ratings or reviews.
pub(crate) fn parse_listing(html: &str, source_name: &str, page_url: &str) -> Vec<RawProduct> {
    let document = Html::parse_document(html);

    document
        .select(&CARD)
        .map(|card| {
            let mut product = RawProduct::new(source_name);
            if let Some(title) = text_of(card, &TITLE) {
                product.title = title;
            }
            if let Some(price) = text_of(card, &PRICE) {
                product.price = price;
            }
            product.image_url = attr_of(card, &IMAGE, "data-src")
                .or_else(|| attr_of(card, &IMAGE, "src"))
                .map_or_else(|| NO_IMAGE.to_owned(), |src| absolutize(page_url, &src));
            product.product_url = link_or_search_page(page_url, attr_of(card, &LINK, "href"));
            product.rating = NOT_RATED.to_owned();
            product.reviews = NO_REVIEWS.to_owned();
            product
        })
        .collect()
}
