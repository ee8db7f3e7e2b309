//! Integration tests for the apply-for-credit flow.
//!
//! Requires a running server with a migrated database. Run with:
//!
//! ```bash
//! cargo test -p coffee-run-integration-tests -- --ignored
//! ```

use reqwest::{Client, redirect};
use uuid::Uuid;

fn base_url() -> String {
    std::env::var("COFFEE_RUN_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("failed to create HTTP client")
}

/// A complete, valid application form for the given identity.
fn application_form(email: &str, first_name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("email", email.to_string()),
        ("re_enter_email", email.to_string()),
        ("first_name", first_name.to_string()),
        ("last_name", "Tester".to_string()),
        ("city", "Fullerton".to_string()),
        ("state", "CA".to_string()),
        ("zip", "92831".to_string()),
        ("gross_income", "45000".to_string()),
        ("ssn_last_four", "1234".to_string()),
        ("apply_for_credit", "true".to_string()),
    ]
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_form_is_public() {
    let client = client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/credit/apply"))
        .send()
        .await
        .expect("form request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body = resp.text().await.expect("failed to read body");
    assert!(body.contains("gross_income"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_blank_submission_rerenders_with_field_errors() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/credit"))
        .form(&[("email", "")])
        .send()
        .await
        .expect("submit request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body = resp.text().await.expect("failed to read body");
    assert!(body.contains("can&#39;t be blank") || body.contains("can't be blank"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_valid_application_redirects_back_to_form() {
    let client = client();
    let base = base_url();
    let email = format!("credit-{}@titanscoffee.com", Uuid::new_v4());

    let resp = client
        .post(format!("{base}/credit"))
        .form(&application_form(&email, "Valid"))
        .send()
        .await
        .expect("submit request failed");
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/credit/apply");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_repeat_submissions_are_rate_limited() {
    let client = client();
    let base = base_url();
    let email = format!("limited-{}@titanscoffee.com", Uuid::new_v4());
    let form = application_form(&email, "Repeat");

    for _ in 0..3 {
        let resp = client
            .post(format!("{base}/credit"))
            .form(&form)
            .send()
            .await
            .expect("submit request failed");
        assert!(resp.status().is_redirection());
    }

    // Fourth submission from the same identity is turned away.
    let resp = client
        .post(format!("{base}/credit"))
        .form(&form)
        .send()
        .await
        .expect("submit request failed");
    assert!(resp.status().is_redirection());

    let follow = client
        .get(format!("{base}/credit/apply"))
        .send()
        .await
        .expect("follow-up request failed");
    let body = follow.text().await.expect("failed to read body");
    assert!(body.contains("too many applications"));
}
