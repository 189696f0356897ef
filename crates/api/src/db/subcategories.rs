//! Subcategory repository.

use sqlx::PgPool;

use tusport_core::SubcategoryId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::catalog::Subcategory;

/// Repository for subcategory database operations.
pub struct SubcategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubcategoryRepository<'a> {
    /// Create a new subcategory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all subcategories ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Subcategory>, RepositoryError> {
        let subcategories =
            sqlx::query_as::<_, Subcategory>("SELECT id, title FROM subcategories ORDER BY title")
                .fetch_all(self.pool)
                .await?;

        Ok(subcategories)
    }

    /// Get a subcategory by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SubcategoryId) -> Result<Option<Subcategory>, RepositoryError> {
        let subcategory =
            sqlx::query_as::<_, Subcategory>("SELECT id, title FROM subcategories WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(subcategory)
    }

    /// Find a subcategory by its (already normalized) title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Subcategory>, RepositoryError> {
        let subcategory = sqlx::query_as::<_, Subcategory>(
            "SELECT id, title FROM subcategories WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(self.pool)
        .await?;

        Ok(subcategory)
    }

    /// Create a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the title already exists.
    pub async fn create(&self, title: &str) -> Result<Subcategory, RepositoryError> {
        let subcategory = sqlx::query_as::<_, Subcategory>(
            "INSERT INTO subcategories (title) VALUES ($1) RETURNING id, title",
        )
        .bind(title)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "subcategory already exists"))?;

        Ok(subcategory)
    }

    /// Rename a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subcategory doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new title is taken.
    pub async fn update(
        &self,
        id: SubcategoryId,
        title: &str,
    ) -> Result<Subcategory, RepositoryError> {
        let subcategory = sqlx::query_as::<_, Subcategory>(
            "UPDATE subcategories SET title = $1 WHERE id = $2 RETURNING id, title",
        )
        .bind(title)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "subcategory already exists"))?;

        subcategory.ok_or(RepositoryError::NotFound)
    }

    /// Delete a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subcategory doesn't exist.
    pub async fn delete(&self, id: SubcategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM subcategories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
