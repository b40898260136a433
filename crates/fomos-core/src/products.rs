use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const NO_TITLE: &str = "No title";
pub const NO_PRICE: &str = "No price";
pub const NOT_RATED: &str = "N/A";
pub const NO_REVIEWS: &str = "No reviews";
pub const NO_IMAGE: &str = "No image";
pub const NO_URL: &str = "No URL";

const DERIVED_KEYS: [&str; 3] = ["normalizedTitle", "imageFingerprint", "imageHash"];

/// A listing as one source extractor produced it.
///
/// Prices, ratings and review counts stay in the site's own formatting; they
/// are only ever displayed, never compared numerically. Fields the service
/// does not know about are kept in [`RawProduct::extra`] and written back out
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    /// Display name of the originating site, e.g. `"Amazon"`.
    #[serde(alias = "name")]
    pub source_name: String,
    #[serde(default = "no_title", deserialize_with = "lenient_text")]
    pub title: String,
    /// Site-native price string, e.g. `"₹1,299"`.
    #[serde(default = "no_price", deserialize_with = "lenient_text")]
    pub price: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_text"
    )]
    pub original_price: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_text"
    )]
    pub discount: Option<String>,
    /// `"0.0"`..=`"5.0"`, or `"N/A"`.
    #[serde(default = "not_rated", deserialize_with = "lenient_text")]
    pub rating: String,
    #[serde(default = "no_reviews", deserialize_with = "lenient_text")]
    pub reviews: String,
    #[serde(default = "no_image", alias = "image", deserialize_with = "lenient_text")]
    pub image_url: String,
    /// Absolute product page URL, or the site search URL when the listing had none.
    #[serde(default = "no_url", alias = "url", deserialize_with = "lenient_text")]
    pub product_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawProduct {
    /// Creates a record with every optional field set to its sentinel.
    #[must_use]
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            title: no_title(),
            price: no_price(),
            original_price: None,
            discount: None,
            rating: not_rated(),
            reviews: no_reviews(),
            image_url: no_image(),
            product_url: no_url(),
            extra: Map::new(),
        }
    }

    /// `true` when the listing carried a usable image reference.
    #[must_use]
    pub fn has_image(&self) -> bool {
        let url = self.image_url.trim();
        !url.is_empty() && url != NO_IMAGE
    }
}

/// A [`RawProduct`] plus the identity signals used for cross-site matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProduct {
    #[serde(flatten)]
    pub raw: RawProduct,
    pub normalized_title: String,
    /// Content hash, fallback token, or the raw image URL when fingerprinting
    /// was disabled.
    #[serde(default, alias = "imageHash")]
    pub image_fingerprint: String,
}

impl EnrichedProduct {
    /// Derived keys the incoming record already carried are dropped from
    /// `extra` so the fresh values are the only ones serialized.
    #[must_use]
    pub fn new(mut raw: RawProduct, normalized_title: String, image_fingerprint: String) -> Self {
        for key in DERIVED_KEYS {
            raw.extra.shift_remove(key);
        }
        Self {
            raw,
            normalized_title,
            image_fingerprint,
        }
    }

    /// The fingerprint when it is non-empty, otherwise the normalized title.
    #[must_use]
    pub fn grouping_key(&self) -> &str {
        if self.image_fingerprint.is_empty() {
            &self.normalized_title
        } else {
            &self.image_fingerprint
        }
    }
}

fn no_title() -> String {
    NO_TITLE.to_string()
}

fn no_price() -> String {
    NO_PRICE.to_string()
}

fn not_rated() -> String {
    NOT_RATED.to_string()
}

fn no_reviews() -> String {
    NO_REVIEWS.to_string()
}

fn no_image() -> String {
    NO_IMAGE.to_string()
}

fn no_url() -> String {
    NO_URL.to_string()
}

/// Scraped payloads sometimes carry ratings or counts as JSON numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(String::from)
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}
