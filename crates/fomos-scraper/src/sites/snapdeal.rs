use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};

use fomos_core::products::NO_IMAGE;
use fomos_core::RawProduct;

use super::{attr_of, first_srcset_url, link_or_search_page, selector, text_of, SearchPage};
use crate::client::absolutize;
use crate::error::ScraperError;
use crate::extractor::SourceExtractor;

static CARD: LazyLock<Selector> = LazyLock::new(|| selector(".product-tuple-listing"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".product-title"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| selector(".product-price"));
static ORIGINAL_PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector(".product-desc-price.strike"));
static DISCOUNT: LazyLock<Selector> = LazyLock::new(|| selector(".product-discount span"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector(".product-tuple-image img"));
static IMAGE_SOURCE: LazyLock<Selector> =
    LazyLock::new(|| selector(".product-tuple-image picture source"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector(".dp-widget-link"));
static FILLED_STARS: LazyLock<Selector> =
    LazyLock::new(|| selector(".rating-stars .filled-stars"));
static REVIEW_COUNT: LazyLock<Selector> = LazyLock::new(|| selector(".product-rating-count"));

pub struct Snapdeal {
    page: SearchPage,
}

impl Snapdeal {
    #[must_use]
    pub fn new(page: SearchPage) -> Self {
        Self { page }
    }
}

#[async_trait]
impl SourceExtractor for Snapdeal {
    fn name(&self) -> &str {
        self.page.name()
    }

    async fn extract(&self, query: &str) -> Result<Vec<RawProduct>, ScraperError> {
        let (page_url, html) = self.page.fetch(query).await?;
        let products = parse_listing(&html, self.page.name(), &page_url);
        tracing::debug!(source = self.page.name(), count = products.len(), "parsed snapdeal listing");
        Ok(products)
    }
}

/// Extracts every `.product-tuple-listing` card from a Snapdeal search page.
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
            product.original_price = text_of(card, &ORIGINAL_PRICE);
            product.discount = text_of(card, &DISCOUNT);

            product.image_url = attr_of(card, &IMAGE, "src")
                .or_else(|| {
                    attr_of(card, &IMAGE_SOURCE, "srcset")
                        .and_then(|set| first_srcset_url(&set).map(str::to_owned))
                })
                .map_or_else(|| NO_IMAGE.to_owned(), |src| absolutize(page_url, &src));

            product.product_url = link_or_search_page(page_url, attr_of(card, &LINK, "href"));

            let width_pct = attr_of(card, &FILLED_STARS, "style")
                .and_then(|style| style_width_percent(&style))
                .filter(|pct| pct.is_finite())
                .map_or(0.0, |pct| pct.clamp(0.0, 100.0));
            product.rating = format!("{:.1}", width_pct / 100.0 * 5.0);

            product.reviews = text_of(card, &REVIEW_COUNT)
                .map(|text| text.replace(['(', ')'], "").trim().to_owned())
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| "0".to_owned());

            product
        })
        .collect()
}

/// Reads the `width` percentage out of an inline style such as `"width:84%;"`.
fn style_width_percent(style: &str) -> Option<f64> {
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        if prop.trim().eq_ignore_ascii_case("width") {
            value.trim().trim_end_matches('%').trim().parse::<f64>().ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://www.snapdeal.com/search?keyword=wireless%20mouse";

    const FIXTURE: &str = r#"
<html><body>
<div class="product-tuple-listing">
  <div class="product-tuple-image">
    <a class="dp-widget-link" href="https://www.snapdeal.com/product/wireless-mouse-x1/6389">
      <img src="https://g.sdlcdn.com/imgs/mouse-x1.jpg" />
    </a>
  </div>
  <p class="product-title">  Wireless Mouse X1 </p>
  <span class="product-desc-price strike">Rs. 999</span>
  <span class="product-price">Rs. 449</span>
  <div class="product-discount"><span>55% Off</span></div>
  <div class="rating-stars"><div class="filled-stars" style="width:84%"></div></div>
  <p class="product-rating-count">(14)</p>
</div>
<div class="product-tuple-listing">
  <div class="product-tuple-image">
    <picture><source srcset="//g.sdlcdn.com/imgs/pad.webp 1x, //g.sdlcdn.com/imgs/pad@2x.webp 2x" /></picture>
  </div>
  <p class="product-title">Mouse Pad</p>
  <span class="product-price">Rs. 99</span>
</div>
<div class="product-tuple-listing"></div>
</body></html>
"#;

    #[test]
    fn parses_every_card_in_order() {
        let products = parse_listing(FIXTURE, "Snapdeal", PAGE_URL);
        assert_eq!(products.len(), 3);
        assert!(products.iter().all(|p| p.source_name == "Snapdeal"));
    }

    #[test]
    fn parses_full_card() {
        let products = parse_listing(FIXTURE, "Snapdeal", PAGE_URL);
        let mouse = &products[0];
        assert_eq!(mouse.title, "Wireless Mouse X1");
        assert_eq!(mouse.price, "Rs. 449");
        assert_eq!(mouse.original_price.as_deref(), Some("Rs. 999"));
        assert_eq!(mouse.discount.as_deref(), Some("55% Off"));
        assert_eq!(mouse.image_url, "https://g.sdlcdn.com/imgs/mouse-x1.jpg");
        assert_eq!(
            mouse.product_url,
            "https://www.snapdeal.com/product/wireless-mouse-x1/6389"
        );
        assert_eq!(mouse.rating, "4.2");
        assert_eq!(mouse.reviews, "14");
    }

    #[test]
    fn falls_back_to_picture_source_and_search_url() {
        let products = parse_listing(FIXTURE, "Snapdeal", PAGE_URL);
        let pad = &products[1];
        assert_eq!(pad.image_url, "https://g.sdlcdn.com/imgs/pad.webp");
        assert_eq!(pad.product_url, PAGE_URL);
        assert_eq!(pad.rating, "0.0");
        assert_eq!(pad.reviews, "0");
        assert!(pad.original_price.is_none());
        assert!(pad.discount.is_none());
    }

    #[test]
    fn empty_card_gets_sentinels() {
        let products = parse_listing(FIXTURE, "Snapdeal", PAGE_URL);
        let empty = &products[2];
        assert_eq!(empty.title, "No title");
        assert_eq!(empty.price, "No price");
        assert_eq!(empty.image_url, NO_IMAGE);
    }

    #[test]
    fn page_without_cards_yields_nothing() {
        assert!(parse_listing("<html><body>No results</body></html>", "Snapdeal", PAGE_URL).is_empty());
    }

    #[test]
    fn style_width_percent_parses_variants() {
        assert_eq!(style_width_percent("width:84%"), Some(84.0));
        assert_eq!(style_width_percent("color: red; WIDTH: 50.5%;"), Some(50.5));
        assert_eq!(style_width_percent("height: 10px"), None);
        assert_eq!(style_width_percent("width: auto"), None);
    }

    #[test]
    fn out_of_range_star_width_is_clamped() {
        let html = r#"
<div class="product-tuple-listing">
  <div class="rating-stars"><div class="filled-stars" style="width:120%"></div></div>
</div>
<div class="product-tuple-listing">
  <div class="rating-stars"><div class="filled-stars" style="width:-10%"></div></div>
</div>
<div class="product-tuple-listing">
  <div class="rating-stars"><div class="filled-stars" style="width:NaN%"></div></div>
</div>
"#;
        let ratings: Vec<String> = parse_listing(html, "Snapdeal", PAGE_URL)
            .into_iter()
            .map(|p| p.rating)
            .collect();
        assert_eq!(ratings, ["5.0", "0.0", "0.0"]);
    }
}
