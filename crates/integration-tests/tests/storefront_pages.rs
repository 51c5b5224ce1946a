//! End-to-end page tests against a fake catalog.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use siraj_store_integration_tests::TestContext;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::start().await.unwrap();
    assert_eq!(ctx.get_text("/health").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_catalog_responses_are_cached() {
    let ctx = TestContext::start().await.unwrap();

    let first = ctx.get_text("/products/5").await.unwrap();
    assert!(first.contains("Dragon Bracelet"));
    let hits = ctx.catalog_hits.count();

    let second = ctx.get_text("/products/5").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(ctx.catalog_hits.count(), hits);
}

#[tokio::test]
async fn test_insecure_images_use_placeholder() {
    let ctx = TestContext::start().await.unwrap();
    let page = ctx.get_text("/products/9").await.unwrap();
    assert!(page.contains("/static/images/placeholder.svg"));
    assert!(!page.contains("http://img.example/9.png"));

    let placeholder = ctx
        .client
        .get(ctx.url("/static/images/placeholder.svg").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(placeholder.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_category_navigation() {
    let ctx = TestContext::start().await.unwrap();
    let index = ctx.get_text("/products").await.unwrap();
    assert!(index.contains("/products/categories/women%27s%20clothing"));

    let page = ctx
        .get_text("/products/categories/women%27s%20clothing")
        .await
        .unwrap();
    assert!(page.contains("Rain Jacket"));
    assert!(!page.contains("Dragon Bracelet"));
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let ctx = TestContext::start().await.unwrap();
    let response = ctx
        .client
        .get(ctx.url("/products/77").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::start().await.unwrap();
    let response = ctx.client.get(ctx.url("/").unwrap()).send().await.unwrap();
    assert!(response.headers().contains_key("content-security-policy"));
    assert!(response.headers().contains_key("x-request-id"));
}
