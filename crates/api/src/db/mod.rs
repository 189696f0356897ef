//! Database operations for the Tu Sport `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` / `admins` - Credential store, keyed by email (two disjoint
//!   tables, not a shared hierarchy)
//! - `categories` / `subcategories` / `categories_subcategories` - Catalog
//!   taxonomy
//! - `products` - Catalog items; category/subcategory references are plain
//!   ids without foreign keys (deletes do not cascade)
//! - `carts` / `cart_lines` - One cart per user, lines keyed by
//!   `(cart, product, size, color)`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p tusport-cli -- migrate
//! ```

pub mod admins;
pub mod carts;
pub mod categories;
pub mod products;
pub mod subcategories;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors produced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value failed to parse back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool is owned by the application state and shared by reference with
/// every repository; there is no process-global handle.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation, otherwise
/// wrap it as a database error.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
