//! Content fingerprints for product images.
//!
//! Two listings whose image URLs serve byte-identical files get the same
//! fingerprint, which is the strongest cross-site identity signal available.
//! When an image cannot be fetched the fingerprinter never errors. It hands
//! back a fallback token that is unique per call, so two broken images are
//! never mistaken for the same product.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::distr::{Alphanumeric, SampleString};
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;

use fomos_core::products::NO_IMAGE;

use crate::error::ScraperError;

/// Prefix shared by every fallback token.
pub const FALLBACK_PREFIX: &str = "fallback-";

const FALLBACK_TOKEN_LEN: usize = 12;

/// Identity token for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    /// Lowercase hex SHA-256 of the image bytes.
    Content(String),
    /// Random token substituted when the image could not be hashed.
    Fallback(String),
}

impl Fingerprint {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Fingerprint::Content(s) | Fingerprint::Fallback(s) => s,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Fingerprint::Fallback(_))
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Fingerprint::Content(s) | Fingerprint::Fallback(s) => s,
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplies fallback tokens. Injected so tests can control the values.
pub trait TokenSource: Send + Sync {
    /// Returns a fresh token; consecutive calls must not repeat.
    fn next_token(&self) -> String;
}

/// `fallback-` plus 12 random alphanumerics from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn next_token(&self) -> String {
        let suffix = Alphanumeric.sample_string(&mut rand::rng(), FALLBACK_TOKEN_LEN);
        format!("{FALLBACK_PREFIX}{suffix}")
    }
}

#[async_trait]
pub trait Fingerprinter: Send + Sync {
    /// Fingerprints the image at `image_url`. Never fails.
    async fn fingerprint(&self, image_url: &str) -> Fingerprint;
}

/// Why an image could not be hashed. Logged, never returned to callers.
#[derive(Debug, Error)]
enum ImageFetchError {
    #[error("listing has no image")]
    Missing,

    #[error("invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("image exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// Downloads images over HTTP and hashes their bytes.
///
/// One request per call with no caching; repeated URLs are fetched again.
pub struct ImageFingerprinter {
    client: Client,
    max_bytes: usize,
    tokens: Arc<dyn TokenSource>,
}

impl ImageFingerprinter {
    /// Creates a fingerprinter with a bounded request timeout and body size.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str, max_bytes: usize) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_bytes,
            tokens: Arc::new(RandomTokens),
        })
    }

    /// Replaces the fallback token source.
    #[must_use]
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    async fn content_digest(&self, image_url: &str) -> Result<String, ImageFetchError> {
        let url = resolve_image_url(image_url)?;

        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::Status(status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(ImageFetchError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let mut hasher = Sha256::new();
        let mut received = 0usize;
        while let Some(chunk) = response.chunk().await? {
            received += chunk.len();
            if received > self.max_bytes {
                return Err(ImageFetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            hasher.update(&chunk);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[async_trait]
impl Fingerprinter for ImageFingerprinter {
    async fn fingerprint(&self, image_url: &str) -> Fingerprint {
        match self.content_digest(image_url).await {
            Ok(digest) => Fingerprint::Content(digest),
            Err(ImageFetchError::Missing) => {
                tracing::debug!("listing has no image, using fallback fingerprint");
                Fingerprint::Fallback(self.tokens.next_token())
            }
            Err(e) => {
                tracing::warn!(image_url, error = %e, "image fingerprint failed, using fallback");
                Fingerprint::Fallback(self.tokens.next_token())
            }
        }
    }
}

/// Turns a scraped image reference into a fetchable http(s) URL.
fn resolve_image_url(image_url: &str) -> Result<reqwest::Url, ImageFetchError> {
    let trimmed = image_url.trim();
    if trimmed.is_empty() || trimmed == NO_IMAGE {
        return Err(ImageFetchError::Missing);
    }

    let candidate = if trimmed.starts_with("//") {
        format!("https:{trimmed}")
    } else {
        trimmed.to_owned()
    };

    let url = reqwest::Url::parse(&candidate)
        .map_err(|e| ImageFetchError::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ImageFetchError::InvalidUrl(format!(
            "{trimmed}: unsupported scheme"
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn random_tokens_have_prefix_and_length() {
        let token = RandomTokens.next_token();
        assert!(token.starts_with(FALLBACK_PREFIX));
        assert_eq!(token.len(), FALLBACK_PREFIX.len() + FALLBACK_TOKEN_LEN);
        assert!(token[FALLBACK_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn random_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1_000).map(|_| RandomTokens.next_token()).collect();
        assert_eq!(tokens.len(), 1_000);
    }

    #[test]
    fn resolve_rejects_sentinel_and_blank() {
        assert!(matches!(
            resolve_image_url(NO_IMAGE),
            Err(ImageFetchError::Missing)
        ));
        assert!(matches!(
            resolve_image_url("   "),
            Err(ImageFetchError::Missing)
        ));
    }

    #[test]
    fn resolve_upgrades_protocol_relative_urls() {
        let url = resolve_image_url("//n1.sdlcdn.com/imgs/a.jpg").expect("valid");
        assert_eq!(url.as_str(), "https://n1.sdlcdn.com/imgs/a.jpg");
    }

    #[test]
    fn resolve_rejects_relative_and_data_urls() {
        assert!(matches!(
            resolve_image_url("/images/a.jpg"),
            Err(ImageFetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            resolve_image_url("data:image/gif;base64,R0lGODlhAQABAAAAACw="),
            Err(ImageFetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn fingerprint_accessors() {
        let content = Fingerprint::Content("abc".to_string());
        let fallback = Fingerprint::Fallback("fallback-xyz".to_string());
        assert!(!content.is_fallback());
        assert!(fallback.is_fallback());
        assert_eq!(content.as_str(), "abc");
        assert_eq!(fallback.to_string(), "fallback-xyz");
        assert_eq!(fallback.into_string(), "fallback-xyz");
    }

    #[tokio::test]
    async fn sentinel_image_gets_fallback_without_network() {
        let fingerprinter =
            ImageFingerprinter::new(1, "fomos-test/0.1", 1024).expect("fingerprinter");
        let fp = fingerprinter.fingerprint(NO_IMAGE).await;
        assert!(fp.is_fallback());
        assert!(fp.as_str().starts_with(FALLBACK_PREFIX));
    }
}
