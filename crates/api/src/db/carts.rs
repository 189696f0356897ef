//! Cart repository.
//!
//! Cart mutations run inside a transaction with a `FOR UPDATE` lock on the
//! affected line, so two concurrent increments of the same
//! `(cart, product, size, color)` line serialize instead of losing an
//! update.

use sqlx::{PgPool, Postgres, Transaction};

use tusport_core::{CartId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine, line_price};
use crate::models::product::Product;

const LINE_COLUMNS: &str = "id, cart_id, product_id, title, quantity, size, color, price";

/// Outcome of removing one unit from a cart line.
#[derive(Debug)]
pub enum RemoveOutcome {
    /// Quantity was above one; the line was decremented and survives.
    Decremented(CartLine),
    /// Quantity was exactly one; the line was deleted.
    Deleted,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's cart, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Get a user's cart, creating it if this is their first access.
    ///
    /// Returns the cart and whether it was freshly created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<(Cart, bool), RepositoryError> {
        if let Some(cart) = self.get_by_user(user_id).await? {
            return Ok((cart, false));
        }

        // Two racing first-accesses both reach the insert; the unique
        // user_id constraint resolves the race in favor of the earlier one.
        let cart = sqlx::query_as::<_, Cart>(
            "INSERT INTO carts (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id \
             RETURNING id, user_id, created_at",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok((cart, true))
    }

    /// All lines in a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM cart_lines WHERE cart_id = $1 ORDER BY id"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add one unit of a product variant to a cart.
    ///
    /// First add of a `(product, size, color)` line stores quantity 1 with
    /// the unit price; repeat adds increment the quantity and recompute the
    /// line price from the product's current unit price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_line(
        &self,
        cart_id: CartId,
        product: &Product,
        size: &str,
        color: &str,
    ) -> Result<CartLine, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing = lock_line(&mut tx, cart_id, product, size, color).await?;

        let line = match existing {
            Some(line) => {
                let quantity = line.quantity + 1;
                sqlx::query_as::<_, CartLine>(&format!(
                    "UPDATE cart_lines SET quantity = $1, price = $2 WHERE id = $3 \
                     RETURNING {LINE_COLUMNS}"
                ))
                .bind(quantity)
                .bind(line_price(product.price, quantity))
                .bind(line.id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, CartLine>(&format!(
                    "INSERT INTO cart_lines (cart_id, product_id, title, quantity, size, color, price) \
                     VALUES ($1, $2, $3, 1, $4, $5, $6) \
                     RETURNING {LINE_COLUMNS}"
                ))
                .bind(cart_id)
                .bind(product.id)
                .bind(&product.title)
                .bind(size)
                .bind(color)
                .bind(product.price)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        Ok(line)
    }

    /// Remove one unit of a product variant from a cart.
    ///
    /// Decrements and reprices the line while quantity is above one;
    /// removing the last unit deletes the line entirely.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn remove_line(
        &self,
        cart_id: CartId,
        product: &Product,
        size: &str,
        color: &str,
    ) -> Result<RemoveOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(line) = lock_line(&mut tx, cart_id, product, size, color).await? else {
            return Err(RepositoryError::NotFound);
        };

        let outcome = if line.quantity > 1 {
            let quantity = line.quantity - 1;
            let line = sqlx::query_as::<_, CartLine>(&format!(
                "UPDATE cart_lines SET quantity = $1, price = $2 WHERE id = $3 \
                 RETURNING {LINE_COLUMNS}"
            ))
            .bind(quantity)
            .bind(line_price(product.price, quantity))
            .bind(line.id)
            .fetch_one(&mut *tx)
            .await?;

            RemoveOutcome::Decremented(line)
        } else {
            sqlx::query("DELETE FROM cart_lines WHERE id = $1")
                .bind(line.id)
                .execute(&mut *tx)
                .await?;

            RemoveOutcome::Deleted
        };

        tx.commit().await?;

        Ok(outcome)
    }
}

/// Lock the line identified by `(cart, product, size, color)` for the rest
/// of the transaction.
async fn lock_line(
    tx: &mut Transaction<'_, Postgres>,
    cart_id: CartId,
    product: &Product,
    size: &str,
    color: &str,
) -> Result<Option<CartLine>, RepositoryError> {
    let line = sqlx::query_as::<_, CartLine>(&format!(
        "SELECT {LINE_COLUMNS} FROM cart_lines \
         WHERE cart_id = $1 AND product_id = $2 AND size = $3 AND color = $4 \
         FOR UPDATE"
    ))
    .bind(cart_id)
    .bind(product.id)
    .bind(size)
    .bind(color)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(line)
}
