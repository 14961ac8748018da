//! Catalog API client tests against a mock catalog.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;
use shopease_core::{Price, ProductId};
use shopease_integration_tests::{TestContext, product_json};
use shopease_storefront::catalog::{CatalogClient, CatalogError};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn client(ctx: &TestContext) -> CatalogClient {
    CatalogClient::new(&ctx.config().catalog).unwrap()
}

#[tokio::test]
async fn test_list_products_parses_summaries() {
    let ctx = TestContext::new().await;
    let mut tee = product_json(1, "Tee", 10.0, 4);
    tee["category"] = json!("apparel");
    tee["variants"] = json!(["S", "M"]);
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([tee, product_json(2, "Mug", 5.5, 0)])),
        )
        .mount(&ctx.catalog)
        .await;

    let products = client(&ctx).await.list_products(None).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].category.as_deref(), Some("apparel"));
    assert_eq!(products[0].variants, vec!["S", "M"]);
    assert!(products[0].is_in_stock());
    assert_eq!(products[1].price, Price::from_cents(550));
    assert!(!products[1].is_in_stock());
}

#[tokio::test]
async fn test_list_products_sends_category_filter() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("category", "home & kitchen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&ctx.catalog)
        .await;

    let products = client(&ctx)
        .await
        .list_products(Some("home & kitchen"))
        .await
        .unwrap();

    assert!(products.is_empty());
}

#[tokio::test]
async fn test_get_product_missing_is_not_found() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/products/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such product"))
        .mount(&ctx.catalog)
        .await;

    let err = client(&ctx)
        .await
        .get_product(ProductId::new(404))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn test_get_product_reads_description() {
    let ctx = TestContext::new().await;
    let mut body = product_json(7, "Tee", 10.0, 4);
    body["description"] = json!("Soft cotton");
    Mock::given(method("GET"))
        .and(path("/products/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&ctx.catalog)
        .await;

    let detail = client(&ctx).await.get_product(ProductId::new(7)).await.unwrap();

    assert_eq!(detail.description.as_deref(), Some("Soft cotton"));
    assert_eq!(detail.quantity, 4);
}

#[tokio::test]
async fn test_decrement_conflict_and_success() {
    let ctx = TestContext::new().await;
    Mock::given(method("PATCH"))
        .and(path("/products/5/decrement"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"detail": "Out of stock"})))
        .mount(&ctx.catalog)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/products/7/decrement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "quantity": 3})))
        .mount(&ctx.catalog)
        .await;
    let client = client(&ctx).await;

    let err = client.decrement(ProductId::new(5)).await.unwrap_err();
    assert!(err.is_conflict());

    let level = client.decrement(ProductId::new(7)).await.unwrap();
    assert_eq!(level.quantity, Some(3));
}

#[tokio::test]
async fn test_decrement_empty_success_body_reports_no_quantity() {
    let ctx = TestContext::new().await;
    Mock::given(method("PATCH"))
        .and(path("/products/8/decrement"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&ctx.catalog)
        .await;

    let level = client(&ctx).await.decrement(ProductId::new(8)).await.unwrap();

    assert_eq!(level.quantity, None);
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let ctx = TestContext::new().await;
    Mock::given(method("PATCH"))
        .and(path("/products/9/decrement"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&ctx.catalog)
        .await;

    let err = client(&ctx).await.decrement(ProductId::new(9)).await.unwrap_err();

    match err {
        CatalogError::Api { status, message } => {
            assert_eq!(status, 503);
            assert!(message.contains("maintenance"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_increment_sends_amount() {
    let ctx = TestContext::new().await;
    Mock::given(method("PATCH"))
        .and(path("/products/3/increment"))
        .and(body_json(json!({"amount": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "quantity": 9})))
        .expect(1)
        .mount(&ctx.catalog)
        .await;

    client(&ctx)
        .await
        .increment(ProductId::new(3), 4)
        .await
        .unwrap();
}
