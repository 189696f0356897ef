//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A registration/login field failed its shape check. Clients only ever
    /// see the generic "Data invalid" message, never which field failed.
    #[error("invalid data")]
    InvalidData,

    /// Wrong password, unknown email, or (for admins) cleared role flags.
    /// One variant on purpose: callers cannot distinguish the cases.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email already registered.
    #[error("account already exists")]
    AccountExists,

    /// Token verification failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
