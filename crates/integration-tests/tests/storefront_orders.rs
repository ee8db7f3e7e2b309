//! Integration tests for the storefront: auth, cart API, and orders.
//!
//! These tests require a running server with a migrated, seeded database:
//!
//! ```bash
//! cargo run -p coffee-run-cli -- migrate && cargo run -p coffee-run-cli -- seed
//! cargo run -p coffee-run-server
//! cargo test -p coffee-run-integration-tests -- --ignored
//! ```

use reqwest::{Client, StatusCode, redirect};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the server (configurable via environment).
fn base_url() -> String {
    std::env::var("COFFEE_RUN_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A cookie-keeping client that does not follow redirects, so tests can
/// assert on the redirect itself.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("failed to create HTTP client")
}

/// Register and sign in a fresh user, returning the signed-in client.
async fn signed_in_client() -> Client {
    let client = client();
    let base = base_url();
    let email = format!("it-{}@titanscoffee.com", Uuid::new_v4());

    let resp = client
        .post(format!("{base}/auth/register"))
        .form(&[
            ("email", email.as_str()),
            ("password", "password123"),
            ("password_confirm", "password123"),
        ])
        .send()
        .await
        .expect("register request failed");
    assert!(resp.status().is_redirection(), "register should redirect");

    client
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_health_probes() {
    let client = client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/up"))
        .send()
        .await
        .expect("liveness request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/up/ready"))
        .send()
        .await
        .expect("readiness request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cart_api_requires_authentication() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/v1/cart_items"))
        .json(&json!({"product_id": 1, "size": "Small", "quantity": 1}))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cart_rejects_unknown_product() {
    let client = signed_in_client().await;
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/v1/cart_items"))
        .json(&json!({"product_id": 999_999, "size": "Small", "quantity": 1}))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cart_rejects_zero_quantity() {
    let client = signed_in_client().await;
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/v1/cart_items"))
        .json(&json!({"product_id": 1, "size": "Small", "quantity": 0}))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.expect("expected a JSON body");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_cart_checkout_redirects_back_to_menu() {
    let client = signed_in_client().await;
    let base = base_url();

    let resp = client
        .post(format!("{base}/orders"))
        .form(&[("notes", "")])
        .send()
        .await
        .expect("checkout request failed");
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/products");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_routes_redirect_regular_users_to_login() {
    let client = signed_in_client().await;
    let base = base_url();

    for path in ["/admin/sales", "/admin/products", "/admin/orders"] {
        let resp = client
            .get(format!("{base}{path}"))
            .send()
            .await
            .expect("admin request failed");
        assert!(
            resp.status().is_redirection(),
            "{path} should not be served to a non-admin"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sales_api_returns_aggregates_for_admin() {
    let client = client();
    let base = base_url();

    // Seeded admin account.
    let resp = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", "admin@titanscoffee.com"), ("password", "test123")])
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_redirection(), "admin login should redirect");

    let resp = client
        .get(format!("{base}/api/v1/sales"))
        .send()
        .await
        .expect("sales request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("expected a JSON body");
    assert!(body["summary"]["total_orders"].is_i64());
    assert!(body["summary"]["total_revenue"].is_string());
    assert!(body["by_product"].is_array());
}
