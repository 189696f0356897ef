//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! tusport-cli admin create -e admin@example.com -u backoffice -p s3cretpass
//! ```
//!
//! The admin API only lets an existing admin register a new one, so the
//! first account of a deployment is bootstrapped here.
//!
//! # Environment Variables
//!
//! - `TUSPORT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use tusport_core::{Email, validate_password, validate_username};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Invalid username or password shape.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Account already exists.
    #[error("Admin already exists with email: {0}")]
    AdminExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new admin account with both role flags set.
///
/// # Errors
///
/// Returns `AdminError` on shape violations, a duplicate email, or database
/// failures.
pub async fn create(email: &str, username: &str, password: &str) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email =
        Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;
    validate_username(username)
        .map_err(|e| AdminError::InvalidCredentials(e.to_string()))?;
    validate_password(password)
        .map_err(|e| AdminError::InvalidCredentials(e.to_string()))?;

    let database_url = std::env::var("TUSPORT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("TUSPORT_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin: {} ({})", username, email);

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM admins WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::AdminExists(email.into_inner()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AdminError::PasswordHash)?
        .to_string();

    let admin_id: i32 = sqlx::query_scalar(
        "INSERT INTO admins (email, username, password_hash, is_active, is_staff) \
         VALUES ($1, $2, $3, TRUE, TRUE) \
         RETURNING id",
    )
    .bind(&email)
    .bind(username)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}",
        admin_id,
        email
    );

    Ok(admin_id)
}
