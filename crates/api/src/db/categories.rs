//! Category repository, including category-subcategory links.

use sqlx::PgPool;

use tusport_core::{CategoryId, SubcategoryId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::catalog::{Category, Subcategory};

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, title FROM categories ORDER BY title")
                .fetch_all(self.pool)
                .await?;

        Ok(categories)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, title FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(category)
    }

    /// Find a category by its (already normalized) title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Category>, RepositoryError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, title FROM categories WHERE title = $1")
                .bind(title)
                .fetch_optional(self.pool)
                .await?;

        Ok(category)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the title already exists.
    pub async fn create(&self, title: &str) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (title) VALUES ($1) RETURNING id, title",
        )
        .bind(title)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "category already exists"))?;

        Ok(category)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new title is taken.
    pub async fn update(&self, id: CategoryId, title: &str) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET title = $1 WHERE id = $2 RETURNING id, title",
        )
        .bind(title)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "category already exists"))?;

        category.ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// Products referencing the category are left untouched - their
    /// references dangle by design.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Category <-> subcategory links
    // =========================================================================

    /// Subcategories linked to a category, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn linked_subcategories(
        &self,
        id: CategoryId,
    ) -> Result<Vec<Subcategory>, RepositoryError> {
        let subcategories = sqlx::query_as::<_, Subcategory>(
            "SELECT s.id, s.title \
             FROM categories_subcategories cs \
             JOIN subcategories s ON s.id = cs.subcategory_id \
             WHERE cs.category_id = $1 \
             ORDER BY s.title",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(subcategories)
    }

    /// Link a subcategory to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the link already exists.
    pub async fn link_subcategory(
        &self,
        category_id: CategoryId,
        subcategory_id: SubcategoryId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO categories_subcategories (category_id, subcategory_id) VALUES ($1, $2)",
        )
        .bind(category_id)
        .bind(subcategory_id)
        .execute(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "subcategory already linked"))?;

        Ok(())
    }

    /// Remove a category-subcategory link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the link doesn't exist.
    pub async fn unlink_subcategory(
        &self,
        category_id: CategoryId,
        subcategory_id: SubcategoryId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM categories_subcategories \
             WHERE category_id = $1 AND subcategory_id = $2",
        )
        .bind(category_id)
        .bind(subcategory_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
