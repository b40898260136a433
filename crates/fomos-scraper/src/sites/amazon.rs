use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use fomos_core::products::{NOT_RATED, NO_IMAGE, NO_PRICE, NO_REVIEWS};
use fomos_core::RawProduct;

use super::{attr_of, link_or_search_page, selector, text_of, SearchPage};
use crate::client::absolutize;
use crate::error::ScraperError;
use crate::extractor::SourceExtractor;

static CARD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[data-component-type="s-search-result"]"#));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-cy="title-recipe"] h2 span"#));
static TITLE_FALLBACK: LazyLock<Selector> = LazyLock::new(|| selector("h2 span"));
static PRICE_SYMBOL: LazyLock<Selector> =
    LazyLock::new(|| selector(".a-price:not(.a-text-price) .a-price-symbol"));
static PRICE_WHOLE: LazyLock<Selector> =
    LazyLock::new(|| selector(".a-price:not(.a-text-price) .a-price-whole"));
static ORIGINAL_PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector(".a-price.a-text-price .a-offscreen"));
static RATING: LazyLock<Selector> = LazyLock::new(|| selector(".a-icon-alt"));
static REVIEWS: LazyLock<Selector> =
    LazyLock::new(|| selector("span.a-size-base.s-underline-text"));
static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(".s-product-image-container .s-image"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-cy="title-recipe"] a"#));
static LINK_FALLBACK: LazyLock<Selector> = LazyLock::new(|| selector("h2 a"));

pub struct Amazon {
    page: SearchPage,
}

impl Amazon {
    #[must_use]
    pub fn new(page: SearchPage) -> Self {
        Self { page }
    }
}

#[async_trait]
impl SourceExtractor for Amazon {
    fn name(&self) -> &str {
        self.page.name()
    }

    async fn extract(&self, query: &str) -> Result<Vec<RawProduct>, ScraperError> {
        let (page_url, html) = self.page.fetch(query).await?;
        let products = parse_listing(&html, self.page.name(), &page_url);
        tracing::debug!(source = self.page.name(), count = products.len(), "parsed amazon listing");
        Ok(products)
    }
}

/// Extracts organic search results from an Amazon result page.
///
/// Sponsored widgets and carousels are not `s-search-result` cards and are
/// skipped by the card selector.
pub(crate) fn parse_listing(html: &str, source_name: &str, page_url: &str) -> Vec<RawProduct> {
    let document = Html::parse_document(html);

    document
        .select(&CARD)
        .map(|card| {
            let mut product = RawProduct::new(source_name);
            if let Some(title) = text_of(card, &TITLE).or_else(|| text_of(card, &TITLE_FALLBACK)) {
                product.title = title;
            }
            product.price = current_price(card).unwrap_or_else(|| NO_PRICE.to_owned());
            product.original_price = text_of(card, &ORIGINAL_PRICE);
            product.rating = text_of(card, &RATING)
                .and_then(|alt| leading_number(&alt).map(str::to_owned))
                .unwrap_or_else(|| NOT_RATED.to_owned());
            product.reviews = text_of(card, &REVIEWS).unwrap_or_else(|| NO_REVIEWS.to_owned());
            product.image_url = attr_of(card, &IMAGE, "src")
                .map_or_else(|| NO_IMAGE.to_owned(), |src| absolutize(page_url, &src));
            product.product_url = link_or_search_page(
                page_url,
                attr_of(card, &LINK, "href").or_else(|| attr_of(card, &LINK_FALLBACK, "href")),
            );
            product
        })
        .collect()
}

/// Currency symbol plus whole units, e.g. `"₹1,299"`.
fn current_price(card: ElementRef<'_>) -> Option<String> {
    let whole = text_of(card, &PRICE_WHOLE)?;
    let whole = whole.trim_end_matches('.');
    let symbol = text_of(card, &PRICE_SYMBOL).unwrap_or_default();
    Some(format!("{symbol}{whole}"))
}

/// `"4.3 out of 5 stars"` → `"4.3"`. Values outside `0..=5` are rejected.
fn leading_number(text: &str) -> Option<&str> {
    let token = text.split_whitespace().next()?;
    token
        .parse::<f64>()
        .ok()
        .filter(|value| (0.0..=5.0).contains(value))
        .map(|_| token)
}
