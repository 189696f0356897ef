//! Integration tests for the Tu Sport API.
//!
//! # Running Tests
//!
//! The tests in `tests/` exercise a live server over HTTP and are
//! `#[ignore]`d by default. To run them:
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p tusport-cli -- migrate
//!
//! # Start the API
//! cargo run -p tusport-api
//!
//! # Run the ignored scenarios
//! cargo test -p tusport-integration-tests -- --ignored
//! ```
//!
//! The base URL defaults to `http://localhost:8000/tu-sport` and can be
//! overridden with `TUSPORT_BASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("TUSPORT_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000/tu-sport".to_string())
}

/// HTTP client for test scenarios.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email per test run so scenarios don't collide across runs.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let mut tag = uuid::Uuid::new_v4().simple().to_string();
    tag.truncate(8);
    format!("{prefix}-{tag}@test.example")
}
