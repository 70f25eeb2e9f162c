//! Integration tests for the order history and linking API.
//!
//! These tests require:
//! - A running `PostgreSQL` database (task db:start)
//! - The storefront server running (cargo run -p dahlia-storefront)
//! - A seeded `storefront.orders` table and a logged-in test session
//!
//! Run with: cargo test -p dahlia-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Create a client with a cookie store so the session survives across calls.
///
/// The identity service owns login; tests obtain a session by posting to it
/// first when `IDENTITY_BASE_URL` and test credentials are configured.
fn http_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_endpoints() {
    let client = http_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Authentication boundary
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_order_history_requires_session() {
    let client = http_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to request order history");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_single_order_requires_session() {
    let client = http_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/orders?id=1"))
        .send()
        .await
        .expect("Failed to request order");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_link_requires_session() {
    let client = http_client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/orders/link"))
        .json(&json!({ "orderIds": [1, 2] }))
        .send()
        .await
        .expect("Failed to post link request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Guest email lookup (no session)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded orders"]
async fn test_guest_email_lookup_returns_list() {
    let client = http_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/orders?email=guest@example.com"))
        .send()
        .await
        .expect("Failed to request guest history");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_guest_email_lookup_unknown_email_is_empty_not_error() {
    let client = http_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/orders?email=nobody-here@example.com"))
        .send()
        .await
        .expect("Failed to request guest history");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body, json!([]));
}

// ============================================================================
// Authenticated flows
// ============================================================================
//
// These assume a seeded session cookie; see src/lib.rs for the setup the
// test environment provides.

#[tokio::test]
#[ignore = "Requires running storefront server and a logged-in test session"]
async fn test_order_history_dedups_and_sorts() {
    let client = http_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to request order history");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let orders = body.as_array().expect("Expected an array");

    // No duplicate ids
    let mut ids: Vec<i64> = orders
        .iter()
        .filter_map(|o| o.get("id").and_then(Value::as_i64))
        .collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total, "order history contains duplicate ids");

    // Newest first
    let timestamps: Vec<&str> = orders
        .iter()
        .filter_map(|o| o.get("createdAt").and_then(Value::as_str))
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted, "order history is not newest-first");
}

#[tokio::test]
#[ignore = "Requires running storefront server and a logged-in test session"]
async fn test_foreign_order_is_forbidden_not_missing() {
    let client = http_client();
    let base_url = storefront_base_url();
    let foreign_id =
        std::env::var("FOREIGN_ORDER_ID").unwrap_or_else(|_| "999001".to_owned());

    let resp = client
        .get(format!("{base_url}/orders?id={foreign_id}"))
        .send()
        .await
        .expect("Failed to request foreign order");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running storefront server and a logged-in test session"]
async fn test_linking_is_idempotent() {
    let client = http_client();
    let base_url = storefront_base_url();

    // First discover candidate guest orders through the aggregated history,
    // then link the guest ones.
    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to request order history");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let guest_ids: Vec<i64> = body
        .as_array()
        .map(|orders| {
            orders
                .iter()
                .filter(|o| o.get("ownerId").is_some_and(Value::is_null))
                .filter_map(|o| o.get("id").and_then(Value::as_i64))
                .collect()
        })
        .unwrap_or_default();

    let resp = client
        .post(format!("{base_url}/orders/link"))
        .json(&json!({ "orderIds": &guest_ids }))
        .send()
        .await
        .expect("Failed to post link request");
    assert_eq!(resp.status(), StatusCode::OK);
    let first: Value = resp.json().await.expect("Failed to parse link response");
    let first_count = first["linkedCount"].as_u64().expect("missing linkedCount");
    assert_eq!(first_count, guest_ids.len() as u64);

    // Second run with the same input must claim nothing.
    let resp = client
        .post(format!("{base_url}/orders/link"))
        .json(&json!({ "orderIds": &guest_ids }))
        .send()
        .await
        .expect("Failed to post link request");
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = resp.json().await.expect("Failed to parse link response");
    assert_eq!(second["linkedCount"].as_u64(), Some(0));
}
