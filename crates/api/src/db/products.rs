//! Product repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use tusport_core::{CategoryId, ProductId, SubcategoryId};

use super::RepositoryError;
use crate::models::product::{Product, ProductWithRefs};

const PRODUCT_COLUMNS: &str = "p.id, p.category_id, p.subcategory_id, p.title, p.description, \
     p.thumbnail, p.image_one, p.image_two, p.image_three, p.image_four, \
     p.colors, p.size, p.price, p.is_active, p.stock";

/// Shared join selecting products with their (possibly dangling) taxonomy
/// titles.
fn joined_select(where_clause: &str, tail: &str) -> String {
    format!(
        "SELECT {PRODUCT_COLUMNS}, c.title AS category_title, s.title AS subcategory_title \
         FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id \
         LEFT JOIN subcategories s ON s.id = p.subcategory_id \
         {where_clause} {tail}"
    )
}

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub title: String,
    pub description: Option<String>,
    pub colors: Option<String>,
    pub size: String,
    pub price: Decimal,
    pub is_active: bool,
    pub stock: i32,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products for the admin surface, ordered by stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithRefs>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductWithRefs>(&joined_select(
            "",
            "ORDER BY p.stock LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// List products visible on the public storefront: active and in stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithRefs>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductWithRefs>(&joined_select(
            "WHERE p.is_active AND p.stock > 0",
            "ORDER BY p.id LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Case-insensitive title substring search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn filter_by_title(
        &self,
        needle: &str,
    ) -> Result<Vec<ProductWithRefs>, RepositoryError> {
        let pattern = format!("%{}%", needle.replace('%', "\\%").replace('_', "\\_"));
        let products = sqlx::query_as::<_, ProductWithRefs>(&joined_select(
            "WHERE p.title ILIKE $1",
            "ORDER BY p.id",
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by id, regardless of visibility.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductWithRefs>, RepositoryError> {
        let product =
            sqlx::query_as::<_, ProductWithRefs>(&joined_select("WHERE p.id = $1", ""))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(product)
    }

    /// Get a publicly visible product by id (active and in stock).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithRefs>, RepositoryError> {
        let product = sqlx::query_as::<_, ProductWithRefs>(&joined_select(
            "WHERE p.id = $1 AND p.is_active AND p.stock > 0",
            "",
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product. The thumbnail starts at the placeholder image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products \
             (category_id, subcategory_id, title, description, colors, size, price, is_active, stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id, category_id, subcategory_id, title, description, thumbnail, \
                       image_one, image_two, image_three, image_four, \
                       colors, size, price, is_active, stock",
        )
        .bind(input.category_id)
        .bind(input.subcategory_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.colors)
        .bind(&input.size)
        .bind(input.price)
        .bind(input.is_active)
        .bind(input.stock)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Replace every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET \
             category_id = $1, subcategory_id = $2, title = $3, description = $4, \
             colors = $5, size = $6, price = $7, is_active = $8, stock = $9 \
             WHERE id = $10",
        )
        .bind(input.category_id)
        .bind(input.subcategory_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.colors)
        .bind(&input.size)
        .bind(input.price)
        .bind(input.is_active)
        .bind(input.stock)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set a product's thumbnail path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn set_thumbnail(&self, id: ProductId, path: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET thumbnail = $1 WHERE id = $2")
            .bind(path)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set one of the four gallery image slots (1..=4).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown product and
    /// `RepositoryError::DataCorruption` for a slot outside 1..=4 (routes
    /// validate the slot before calling).
    pub async fn set_image(
        &self,
        id: ProductId,
        slot: u8,
        path: &str,
    ) -> Result<(), RepositoryError> {
        let column = match slot {
            1 => "image_one",
            2 => "image_two",
            3 => "image_three",
            4 => "image_four",
            other => {
                return Err(RepositoryError::DataCorruption(format!(
                    "image slot out of range: {other}"
                )));
            }
        };

        // `column` comes from the match arm above, never from user input.
        let result = sqlx::query(&format!("UPDATE products SET {column} = $1 WHERE id = $2"))
            .bind(path)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
