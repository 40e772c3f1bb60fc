//! Integration tests for `ShopifyClient` against a local `wiremock` server.
//!
//! Covers the paginated catalog read (products, then each product's variants
//! and media), the three reorder mutations, the rate-limit path (cooldown
//! then error, never a retry), and a reconciler run wired to the real client.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sellorder_core::SalesRecord;
use sellorder_engine::{
    AbortReason, CatalogWriter, OptionOrder, ProductReconciler, SalesTallyIndex, StageResult,
};
use sellorder_shopify::config::graphql_endpoint;
use sellorder_shopify::queries::PRODUCTS_PAGE_LIMIT;
use sellorder_shopify::{Pacer, ShopifyClient, ShopifyConfig, ShopifyError};

const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";

/// Builds a `ShopifyClient` pointed at the mock server with no cooldown.
fn test_client(server: &MockServer) -> ShopifyClient {
    ShopifyClient::new(ShopifyConfig {
        endpoint: graphql_endpoint(&server.uri(), "2024-10").expect("mock endpoint"),
        access_token: "shpat_test".to_owned(),
        request_timeout: Duration::from_secs(5),
        rate_limit_cooldown: Duration::ZERO,
    })
    .expect("failed to build test ShopifyClient")
}

fn product_gid(id: u32) -> String {
    format!("gid://shopify/Product/{id}")
}

fn product_header(id: u32, title: &str) -> serde_json::Value {
    json!({
        "id": product_gid(id),
        "title": title,
        "handle": title.to_lowercase(),
        "options": [
            { "id": "gid://shopify/ProductOption/1", "name": "Color", "position": 1, "values": ["Blue", "Red"] },
            { "id": "gid://shopify/ProductOption/2", "name": "Size", "position": 2, "values": ["S", "M"] }
        ]
    })
}

fn products_page(nodes: &[serde_json::Value], next: Option<&str>) -> serde_json::Value {
    json!({
        "data": {
            "products": {
                "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
                "nodes": nodes
            }
        }
    })
}

fn product_connection_page(
    field: &str,
    nodes: &serde_json::Value,
    next: Option<&str>,
) -> serde_json::Value {
    json!({
        "data": {
            "product": {
                field: {
                    "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
                    "nodes": nodes
                }
            }
        }
    })
}

fn tee_variants() -> serde_json::Value {
    json!([
        { "id": "gid://shopify/ProductVariant/1", "title": "Blue / S", "inventoryQuantity": 3,
          "media": { "nodes": [{ "id": "gid://shopify/MediaImage/1" }] } },
        { "id": "gid://shopify/ProductVariant/2", "title": "Red / S", "inventoryQuantity": 8,
          "media": { "nodes": [{ "id": "gid://shopify/MediaImage/2" }] } }
    ])
}

fn tee_media() -> serde_json::Value {
    json!([
        { "id": "gid://shopify/MediaImage/1", "image": { "url": "https://cdn/blue.jpg" } },
        { "id": "gid://shopify/MediaImage/2", "image": { "url": "https://cdn/red.jpg" } }
    ])
}

/// Mounts single-page variant and media responses for one product.
async fn mount_details(server: &MockServer, id: u32) {
    let id_match = format!("\"id\":\"{}\"", product_gid(id));

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query ProductVariants"))
        .and(body_string_contains(id_match.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(product_connection_page("variants", &tee_variants(), None)),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query ProductMedia"))
        .and(body_string_contains(id_match.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(product_connection_page("media", &tee_media(), None)),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a one-page catalog holding the "Tee" product and its details.
async fn mount_tee_catalog(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query TaggedProducts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(&[product_header(1, "Tee")], None)),
        )
        .mount(server)
        .await;
    mount_details(server, 1).await;
}

// ---------------------------------------------------------------------------
// Catalog reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_tagged_products_sends_token_and_tag_filter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .and(body_string_contains("tag:'sort-by-sales'"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(&[product_header(1, "Tee")], None)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_details(&server, 1).await;

    let products = test_client(&server)
        .fetch_tagged_products("sort-by-sales", 50, &Pacer::default())
        .await
        .expect("fetch should succeed");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Tee");
    assert_eq!(products[0].options.len(), 2);
    assert_eq!(products[0].images.len(), 2);
    assert_eq!(
        products[0].variants[1].image_id.as_deref(),
        Some("gid://shopify/MediaImage/2")
    );
}

#[tokio::test]
async fn fetch_tagged_products_follows_cursor_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query TaggedProducts"))
        .and(body_string_contains("\"after\":null"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(&[product_header(1, "Tee")], Some("cursor2"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query TaggedProducts"))
        .and(body_string_contains("\"after\":\"cursor2\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(&[product_header(2, "Hoodie")], None)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_details(&server, 1).await;
    mount_details(&server, 2).await;

    let products = test_client(&server)
        .fetch_tagged_products("sort-by-sales", 1, &Pacer::default())
        .await
        .expect("fetch should succeed");

    let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Tee", "Hoodie"]);
}

#[tokio::test]
async fn oversized_page_size_is_capped_to_query_cost_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query TaggedProducts"))
        .and(body_string_contains(
            format!("\"first\":{PRODUCTS_PAGE_LIMIT}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    let products = test_client(&server)
        .fetch_tagged_products("sort-by-sales", 250, &Pacer::default())
        .await
        .expect("fetch should succeed");

    assert!(products.is_empty());
}

#[tokio::test]
async fn variants_are_read_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query TaggedProducts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(&[product_header(1, "Tee")], None)),
        )
        .mount(&server)
        .await;

    let variants = tee_variants();
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query ProductVariants"))
        .and(body_string_contains("\"after\":null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_connection_page(
            "variants",
            &json!([variants[0]]),
            Some("v2"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query ProductVariants"))
        .and(body_string_contains("\"after\":\"v2\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_connection_page(
            "variants",
            &json!([variants[1]]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query ProductMedia"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(product_connection_page("media", &tee_media(), None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let products = test_client(&server)
        .fetch_tagged_products("sort-by-sales", 50, &Pacer::default())
        .await
        .expect("fetch should succeed");

    let variant_titles: Vec<&str> = products[0]
        .variants
        .iter()
        .map(|v| v.title.as_str())
        .collect();
    assert_eq!(variant_titles, ["Blue / S", "Red / S"]);
}

#[tokio::test]
async fn every_page_read_is_followed_by_the_page_delay() {
    let server = MockServer::start().await;
    mount_tee_catalog(&server).await;

    let delay = Duration::from_millis(40);
    let start = std::time::Instant::now();
    test_client(&server)
        .fetch_tagged_products("sort-by-sales", 50, &Pacer::new(delay))
        .await
        .expect("fetch should succeed");

    // Products page, variants page, media page.
    assert!(
        start.elapsed() >= delay * 3,
        "elapsed {:?} is shorter than three page delays",
        start.elapsed()
    );
}

#[tokio::test]
async fn product_deleted_mid_read_is_missing_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query TaggedProducts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_page(&[product_header(1, "Tee")], None)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query ProductVariants"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": null } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_tagged_products("sort-by-sales", 50, &Pacer::default())
        .await;

    assert!(
        matches!(result, Err(ShopifyError::MissingData { .. })),
        "expected MissingData, got: {result:?}"
    );
}

#[tokio::test]
async fn http_429_surfaces_rate_limited_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_tagged_products("sort-by-sales", 50, &Pacer::default())
        .await;

    assert!(
        matches!(
            result,
            Err(ShopifyError::RateLimited {
                retry_after_secs: Some(0)
            })
        ),
        "expected RateLimited, got: {result:?}"
    );
}

#[tokio::test]
async fn graphql_throttled_error_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_products_page("sort-by-sales", 50, None)
        .await;

    assert!(matches!(result, Err(ShopifyError::RateLimited { .. })));
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_products_page("sort-by-sales", 50, None)
        .await;

    assert!(
        matches!(result, Err(ShopifyError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn query_errors_are_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Field 'media' doesn't exist on type 'Product'" }]
        })))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_products_page("sort-by-sales", 50, None)
        .await;

    assert!(matches!(result, Err(ShopifyError::GraphQl { .. })));
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_products_page("sort-by-sales", 50, None)
        .await;

    assert!(matches!(result, Err(ShopifyError::Deserialize { .. })));
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reorder_options_maps_user_errors_and_missing_product() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productOptionsReorder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productOptionsReorder": {
                "product": null,
                "userErrors": [{ "field": ["options", "0", "name"], "message": "Option does not exist" }]
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = vec![OptionOrder {
        option_id: "gid://shopify/ProductOption/1".to_owned(),
        name: "Color".to_owned(),
        values: vec!["Red".to_owned()],
    }];
    let outcome = test_client(&server)
        .reorder_options("gid://shopify/Product/1", &options)
        .await
        .expect("mutation reached the API");

    assert!(!outcome.product_returned);
    assert_eq!(outcome.user_errors.len(), 1);
    assert_eq!(
        outcome.user_errors[0].to_string(),
        "options.0.name: Option does not exist"
    );
}

#[tokio::test]
async fn reorder_images_treats_job_as_returned_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productReorderMedia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productReorderMedia": {
                "job": { "id": "gid://shopify/Job/1" },
                "mediaUserErrors": []
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server)
        .reorder_images("gid://shopify/Product/1", &["gid://shopify/MediaImage/2".to_owned()])
        .await
        .expect("mutation reached the API");

    assert!(outcome.product_returned);
    assert!(outcome.is_clean());
}

#[tokio::test]
async fn null_mutation_payload_is_missing_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productVariantsBulkReorder": null }
        })))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .reorder_variants("gid://shopify/Product/1", &[])
        .await;

    assert!(matches!(result, Err(ShopifyError::MissingData { .. })));
}

// ---------------------------------------------------------------------------
// Reconciler wired to the client
// ---------------------------------------------------------------------------

fn tee_tally() -> SalesTallyIndex {
    SalesTallyIndex::build(&[
        SalesRecord::new("Tee", "Red / S", 10),
        SalesRecord::new("Tee", "Blue / S", 3),
    ])
}

#[tokio::test]
async fn failed_options_write_stops_remaining_mutations() {
    let server = MockServer::start().await;

    mount_tee_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productOptionsReorder"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productVariantsBulkReorder"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productReorderMedia"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let products = client
        .fetch_tagged_products("sort-by-sales", 50, &Pacer::default())
        .await
        .unwrap();
    let tally = tee_tally();
    let outcome = ProductReconciler::new(&tally, "Color")
        .reconcile(&products[0], &client)
        .await;

    assert_eq!(outcome.abort_reason(), Some(AbortReason::OptionsWriteFailed));
    assert_eq!(outcome.variants_write, StageResult::NotAttempted);
}

#[tokio::test]
async fn failed_variants_write_still_reorders_media() {
    let server = MockServer::start().await;

    mount_tee_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productOptionsReorder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productOptionsReorder": {
                "product": { "id": "gid://shopify/Product/1" },
                "userErrors": []
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productVariantsBulkReorder"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    // Red sells more, so the red image moves to the front.
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("productReorderMedia"))
        .and(body_string_contains(
            r#"{"id":"gid://shopify/MediaImage/2","newPosition":"0"}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productReorderMedia": {
                "job": { "id": "gid://shopify/Job/9" },
                "mediaUserErrors": []
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let products = client
        .fetch_tagged_products("sort-by-sales", 50, &Pacer::default())
        .await
        .unwrap();
    let tally = tee_tally();
    let outcome = ProductReconciler::new(&tally, "Color")
        .reconcile(&products[0], &client)
        .await;

    assert_eq!(outcome.options_write, StageResult::Applied);
    assert_eq!(outcome.variants_write, StageResult::Failed);
    assert_eq!(outcome.images_write, StageResult::Applied);
    assert!(outcome.is_partial());
}
