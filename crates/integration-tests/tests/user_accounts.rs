//! End-to-end account scenarios against a running server.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API running (cargo run -p tusport-api)
//!
//! Run with: cargo test -p tusport-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use tusport_integration_tests::{base_url, client, unique_email};

fn register_body(email: &str, username: &str, password: &str) -> Value {
    json!({"user": {"email": email, "username": username, "password": password}})
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn register_login_then_get_current_user() {
    let client = client();
    let base = base_url();
    let email = unique_email("alice");

    // Register
    let resp = client
        .post(format!("{base}/api-rest/users/register"))
        .json(&register_body(&email, "alice", "password1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"]["token"].as_str().is_some());

    // Login with the same credentials
    let resp = client
        .post(format!("{base}/api-rest/users/login"))
        .json(&json!({"user": {"email": email, "password": "password1"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let token = body["user"]["token"].as_str().unwrap().to_owned();

    // The guard accepts the issued token and re-mints a fresh one
    let resp = client
        .get(format!("{base}/api-rest/users"))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"]["token"].as_str().is_some());
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn duplicate_registration_conflicts() {
    let client = client();
    let base = base_url();
    let email = unique_email("dup");

    let resp = client
        .post(format!("{base}/api-rest/users/register"))
        .json(&register_body(&email, "duper", "password1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base}/api-rest/users/register"))
        .json(&register_body(&email, "duper", "password1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let client = client();
    let base = base_url();
    let email = unique_email("enum");

    client
        .post(format!("{base}/api-rest/users/register"))
        .json(&register_body(&email, "enumer", "password1"))
        .send()
        .await
        .unwrap();

    let wrong_password = client
        .post(format!("{base}/api-rest/users/login"))
        .json(&json!({"user": {"email": email, "password": "password2"}}))
        .send()
        .await
        .unwrap();

    let unknown_email = client
        .post(format!("{base}/api-rest/users/login"))
        .json(&json!({"user": {"email": unique_email("ghost"), "password": "password1"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), unknown_email.status());
    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a, b); // identical bodies: no enumeration signal
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn user_token_is_rejected_by_admin_surface() {
    let client = client();
    let base = base_url();
    let email = unique_email("cross");

    let resp = client
        .post(format!("{base}/api-rest/users/register"))
        .json(&register_body(&email, "crosser", "password1"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let token = body["user"]["token"].as_str().unwrap().to_owned();

    // A user-domain token must not open any admin route
    let resp = client
        .get(format!("{base}/admin/api-rest/categories"))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn guard_requires_exact_bearer_prefix() {
    let client = client();
    let base = base_url();

    let missing = client
        .get(format!("{base}/api-rest/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong_prefix = client
        .get(format!("{base}/api-rest/users"))
        .header("Authorization", "Token abc")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_prefix.status(), StatusCode::UNAUTHORIZED);
}
