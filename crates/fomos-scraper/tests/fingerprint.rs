//! Integration tests for `ImageFingerprinter` against a local `wiremock` server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fomos_scraper::{Fingerprint, Fingerprinter, ImageFingerprinter, TokenSource, FALLBACK_PREFIX};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfomos-test-image";

/// SHA-256 of `PNG_BYTES`, lowercase hex.
fn expected_digest() -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(PNG_BYTES))
}

fn test_fingerprinter(max_bytes: usize) -> ImageFingerprinter {
    ImageFingerprinter::new(5, "fomos-test/0.1", max_bytes).expect("failed to build fingerprinter")
}

/// Hands out `fallback-0`, `fallback-1`, ... so assertions can be exact.
#[derive(Default)]
struct SequenceTokens {
    next: AtomicUsize,
}

impl TokenSource for SequenceTokens {
    fn next_token(&self) -> String {
        format!("{FALLBACK_PREFIX}{}", self.next.fetch_add(1, Ordering::SeqCst))
    }
}

async fn serve_image(server: &MockServer, image_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn identical_bytes_at_different_urls_share_a_fingerprint() {
    let site_a = MockServer::start().await;
    let site_b = MockServer::start().await;
    serve_image(&site_a, "/img/mouse.png", PNG_BYTES).await;
    serve_image(&site_b, "/cdn/other-name.png", PNG_BYTES).await;

    let fingerprinter = test_fingerprinter(1024);
    let a = fingerprinter
        .fingerprint(&format!("{}/img/mouse.png", site_a.uri()))
        .await;
    let b = fingerprinter
        .fingerprint(&format!("{}/cdn/other-name.png", site_b.uri()))
        .await;

    assert_eq!(a, Fingerprint::Content(expected_digest()));
    assert_eq!(a, b);
    assert_eq!(a.as_str().len(), 64);
}

#[tokio::test]
async fn different_bytes_give_different_fingerprints() {
    let server = MockServer::start().await;
    serve_image(&server, "/a.png", PNG_BYTES).await;
    serve_image(&server, "/b.png", b"another image").await;

    let fingerprinter = test_fingerprinter(1024);
    let a = fingerprinter.fingerprint(&format!("{}/a.png", server.uri())).await;
    let b = fingerprinter.fingerprint(&format!("{}/b.png", server.uri())).await;

    assert!(!a.is_fallback());
    assert!(!b.is_fallback());
    assert_ne!(a, b);
}

#[tokio::test]
async fn not_found_and_sentinel_yield_distinct_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fingerprinter = test_fingerprinter(1024);
    let missing = fingerprinter
        .fingerprint(&format!("{}/gone.png", server.uri()))
        .await;
    let sentinel = fingerprinter.fingerprint("No image").await;

    assert!(missing.is_fallback());
    assert!(sentinel.is_fallback());
    assert!(missing.as_str().starts_with(FALLBACK_PREFIX));
    assert_ne!(missing, sentinel);
}

#[tokio::test]
async fn repeated_failures_on_same_url_never_collide() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fingerprinter = test_fingerprinter(1024);
    let url = format!("{}/broken.png", server.uri());
    let first = fingerprinter.fingerprint(&url).await;
    let second = fingerprinter.fingerprint(&url).await;

    assert!(first.is_fallback() && second.is_fallback());
    assert_ne!(first, second);
}

#[tokio::test]
async fn oversized_body_falls_back() {
    let server = MockServer::start().await;
    serve_image(&server, "/huge.png", &[0u8; 4096]).await;

    let fingerprinter = test_fingerprinter(1024);
    let fp = fingerprinter
        .fingerprint(&format!("{}/huge.png", server.uri()))
        .await;

    assert!(fp.is_fallback(), "expected fallback, got: {fp:?}");
}

#[tokio::test]
async fn injected_token_source_controls_fallback_values() {
    let fingerprinter = test_fingerprinter(1024).with_token_source(Arc::new(SequenceTokens::default()));

    let first = fingerprinter.fingerprint("No image").await;
    let second = fingerprinter.fingerprint("not a url").await;

    assert_eq!(first, Fingerprint::Fallback("fallback-0".to_string()));
    assert_eq!(second, Fingerprint::Fallback("fallback-1".to_string()));
}

#[tokio::test]
async fn slow_image_host_falls_back_within_the_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(PNG_BYTES.to_vec())
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fingerprinter =
        ImageFingerprinter::new(1, "fomos-test/0.1", 1024).expect("failed to build fingerprinter");
    let started = std::time::Instant::now();
    let fingerprint = fingerprinter
        .fingerprint(&format!("{}/slow.png", server.uri()))
        .await;

    assert!(fingerprint.is_fallback());
    assert!(fingerprint.as_str().starts_with(FALLBACK_PREFIX));
    assert!(started.elapsed() < std::time::Duration::from_millis(2_500));
}
