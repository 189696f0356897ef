//! End-to-end cart scenarios against a running server.
//!
//! Requires a running database (with at least one active product seeded via
//! `tusport-cli seed`) and the API. Run with:
//! `cargo test -p tusport-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use tusport_integration_tests::{base_url, client, unique_email};

/// Register a fresh user and return their bearer token.
async fn register(client: &reqwest::Client, base: &str) -> String {
    let resp = client
        .post(format!("{base}/api-rest/users/register"))
        .json(&json!({"user": {
            "email": unique_email("cart"),
            "username": "carter",
            "password": "password1",
        }}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["user"]["token"].as_str().unwrap().to_owned()
}

/// First product id visible on the public catalog.
async fn any_product_id(client: &reqwest::Client, base: &str) -> i64 {
    let resp = client
        .get(format!("{base}/api-rest/products"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    body["products"][0]["id"]
        .as_i64()
        .expect("catalog is empty - run `tusport-cli seed` first")
}

#[tokio::test]
#[ignore = "requires a running server and a seeded database"]
async fn add_twice_remove_twice_walks_quantity_and_price() {
    let client = client();
    let base = base_url();
    let token = register(&client, &base).await;
    let product_id = any_product_id(&client, &base).await;

    let variant = json!({"product": {"size": "M", "color": "black"}});
    let auth = format!("Bearer {token}");

    // First view lazily creates the cart
    let resp = client
        .get(format!("{base}/api-rest/cart"))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // First add: quantity 1, price = unit price
    let resp = client
        .post(format!("{base}/api-rest/cartproduct/{product_id}"))
        .header("Authorization", &auth)
        .json(&variant)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["product"]["quantity"], 1);
    let unit_price: f64 = body["product"]["price"].as_str().unwrap().parse().unwrap();

    // Second add: quantity 2, price = 2 x unit price
    let resp = client
        .post(format!("{base}/api-rest/cartproduct/{product_id}"))
        .header("Authorization", &auth)
        .json(&variant)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["product"]["quantity"], 2);
    let double_price: f64 = body["product"]["price"].as_str().unwrap().parse().unwrap();
    assert!((double_price - 2.0 * unit_price).abs() < 1e-9);

    // Remove one unit: back to quantity 1 and the unit price
    let resp = client
        .delete(format!("{base}/api-rest/cartproduct/{product_id}"))
        .header("Authorization", &auth)
        .json(&variant)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["product"]["quantity"], 1);
    let single_price: f64 = body["product"]["price"].as_str().unwrap().parse().unwrap();
    assert!((single_price - unit_price).abs() < 1e-9);

    // Remove the last unit: the line is deleted
    let resp = client
        .delete(format!("{base}/api-rest/cartproduct/{product_id}"))
        .header("Authorization", &auth)
        .json(&variant)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The cart is empty again
    let resp = client
        .get(format!("{base}/api-rest/cart"))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["cart"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore = "requires a running server and a seeded database"]
async fn different_size_is_a_distinct_line() {
    let client = client();
    let base = base_url();
    let token = register(&client, &base).await;
    let product_id = any_product_id(&client, &base).await;
    let auth = format!("Bearer {token}");

    client
        .get(format!("{base}/api-rest/cart"))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();

    for size in ["S", "M"] {
        let resp = client
            .post(format!("{base}/api-rest/cartproduct/{product_id}"))
            .header("Authorization", &auth)
            .json(&json!({"product": {"size": size, "color": "black"}}))
            .send()
            .await
            .unwrap();
        let body: Value = resp.json().await.unwrap();
        // Each (size, color) pair starts its own line at quantity 1
        assert_eq!(body["product"]["quantity"], 1);
    }

    let resp = client
        .get(format!("{base}/api-rest/cart"))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["cart"].as_array().unwrap().len(), 2);
}
