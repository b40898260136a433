use super::*;

#[test]
fn search_url_encodes_query() {
    let url = PageClient::search_url("https://www.amazon.in/s?k={query}", "wireless mouse & pad");
    assert_eq!(url, "https://www.amazon.in/s?k=wireless%20mouse%20%26%20pad");
}

#[test]
fn search_url_trims_query() {
    let url = PageClient::search_url("https://www.jiomart.com/search/{query}", "  mouse ");
    assert_eq!(url, "https://www.jiomart.com/search/mouse");
}

#[test]
fn search_url_encodes_path_separators() {
    let url = PageClient::search_url("https://www.jiomart.com/search/{query}", "usb-c/hdmi");
    assert_eq!(url, "https://www.jiomart.com/search/usb%2Dc%2Fhdmi");
}

#[tokio::test]
async fn fetch_html_rejects_relative_url() {
    let client = PageClient::new(5, "fomos-test/0.1", 0, 0).expect("client");
    let err = client.fetch_html("/search?keyword=mouse").await.unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_html_rejects_non_http_scheme() {
    let client = PageClient::new(5, "fomos-test/0.1", 0, 0).expect("client");
    let err = client.fetch_html("ftp://example.com/list").await.unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { ref reason, .. } if reason.contains("ftp")),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[test]
fn home_referer_is_origin_with_trailing_slash() {
    let page = reqwest::Url::parse("https://www.amazon.in/s?k=mouse").expect("url");
    assert_eq!(home_referer(&page), "https://www.amazon.in/");
}

#[test]
fn home_referer_keeps_non_default_port() {
    let page = reqwest::Url::parse("http://127.0.0.1:8080/search/mouse").expect("url");
    assert_eq!(home_referer(&page), "http://127.0.0.1:8080/");
}

#[test]
fn site_host_drops_scheme_and_path() {
    let page = reqwest::Url::parse("https://www.snapdeal.com/search?keyword=x").expect("url");
    assert_eq!(site_host(&page), "www.snapdeal.com");
}

#[test]
fn site_host_keeps_explicit_port() {
    let page = reqwest::Url::parse("http://127.0.0.1:8080/search").expect("url");
    assert_eq!(site_host(&page), "127.0.0.1:8080");
}

#[test]
fn absolutize_joins_root_relative_path() {
    assert_eq!(
        absolutize("https://www.jiomart.com/search/mouse", "/p/electronics/mouse/123"),
        "https://www.jiomart.com/p/electronics/mouse/123"
    );
}

#[test]
fn absolutize_handles_protocol_relative() {
    assert_eq!(
        absolutize("https://www.snapdeal.com/search?keyword=x", "//n1.sdlcdn.com/img.jpg"),
        "https://n1.sdlcdn.com/img.jpg"
    );
}

#[test]
fn absolutize_keeps_absolute_links() {
    assert_eq!(
        absolutize("https://www.amazon.in/s?k=x", "https://m.media-amazon.com/a.jpg"),
        "https://m.media-amazon.com/a.jpg"
    );
}
