//! Admin repository for database operations.

use sqlx::{FromRow, PgPool};

use tusport_core::Email;

use super::{RepositoryError, conflict_on_unique};
use crate::models::account::Admin;

/// An admin row together with its password hash, used only at login.
#[derive(Debug, FromRow)]
pub struct AdminWithHash {
    #[sqlx(flatten)]
    pub admin: Admin,
    pub password_hash: String,
}

const ADMIN_COLUMNS: &str = "id, email, username, is_active, is_staff, created_at";

/// Repository for admin database operations.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an admin by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Create a new admin. New admins are active staff by default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        username: &str,
        password_hash: &str,
    ) -> Result<Admin, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (email, username, password_hash, is_active, is_staff) \
             VALUES ($1, $2, $3, TRUE, TRUE) \
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email already registered"))?;

        Ok(admin)
    }

    /// Get an admin together with their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_hash(
        &self,
        email: &Email,
    ) -> Result<Option<AdminWithHash>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminWithHash>(&format!(
            "SELECT {ADMIN_COLUMNS}, password_hash FROM admins WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
