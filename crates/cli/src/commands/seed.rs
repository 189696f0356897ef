//! Catalog seed command.
//!
//! Inserts a small sample taxonomy and product set for local development.
//! Titles go in already uppercased, matching what the admin API would have
//! stored.
//!
//! # Usage
//!
//! ```bash
//! tusport-cli seed
//! ```

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct SampleProduct {
    category: &'static str,
    subcategory: &'static str,
    title: &'static str,
    description: &'static str,
    colors: Option<&'static str>,
    size: &'static str,
    price: Decimal,
    stock: i32,
}

fn sample_products() -> Vec<SampleProduct> {
    vec![
        SampleProduct {
            category: "FOOTWEAR",
            subcategory: "RUNNING",
            title: "Trail runner",
            description: "Lightweight trail running shoe",
            colors: Some("black blue"),
            size: "39 40 41 42 43",
            price: Decimal::new(7999, 2),
            stock: 25,
        },
        SampleProduct {
            category: "FOOTWEAR",
            subcategory: "FOOTBALL",
            title: "Turf boot",
            description: "Firm-ground football boot",
            colors: Some("white red"),
            size: "40 41 42 43 44",
            price: Decimal::new(10950, 2),
            stock: 12,
        },
        SampleProduct {
            category: "APPAREL",
            subcategory: "RUNNING",
            title: "Breathable tee",
            description: "Moisture-wicking training tee",
            colors: Some("black white green"),
            size: "S M L XL",
            price: Decimal::new(2450, 2),
            stock: 60,
        },
    ]
}

/// Seed the catalog.
///
/// Idempotent: taxonomy rows are upserted by title and products are skipped
/// when a row with the same title already exists.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("TUSPORT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| SeedError::MissingEnvVar("TUSPORT_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let mut inserted = 0usize;
    for sample in sample_products() {
        let category_id = upsert_taxon(&pool, "categories", sample.category).await?;
        let subcategory_id = upsert_taxon(&pool, "subcategories", sample.subcategory).await?;

        sqlx::query(
            "INSERT INTO categories_subcategories (category_id, subcategory_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(category_id)
        .bind(subcategory_id)
        .execute(&pool)
        .await?;

        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM products WHERE title = $1")
            .bind(sample.title)
            .fetch_optional(&pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query(
            "INSERT INTO products \
             (category_id, subcategory_id, title, description, colors, size, price, is_active, stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)",
        )
        .bind(category_id)
        .bind(subcategory_id)
        .bind(sample.title)
        .bind(sample.description)
        .bind(sample.colors)
        .bind(sample.size)
        .bind(sample.price)
        .bind(sample.stock)
        .execute(&pool)
        .await?;

        inserted += 1;
    }

    tracing::info!("Seed complete: {} products inserted", inserted);
    Ok(())
}

/// Insert-or-fetch a taxonomy row by title.
async fn upsert_taxon(pool: &PgPool, table: &str, title: &str) -> Result<i32, SeedError> {
    // `table` is one of two literals above, never user input.
    let id: i32 = sqlx::query_scalar(&format!(
        "INSERT INTO {table} (title) VALUES ($1) \
         ON CONFLICT (title) DO UPDATE SET title = EXCLUDED.title \
         RETURNING id"
    ))
    .bind(title)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
