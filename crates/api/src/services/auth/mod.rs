//! Authentication service.
//!
//! Registration, login and identity refresh for the two account roles. The
//! roles share all of their mechanics - shape validation, argon2 hashing,
//! token issuance - and differ only in data: which table backs them, which
//! token codec signs for them, and the admin's extra flag predicate.
//!
//! Tokens carry only the account email as subject. In particular the
//! password is never embedded in token claims; identity refresh re-mints
//! from the verified email alone.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, IssuedToken, TokenCodec, TokenError};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use tusport_core::{Email, validate_password, validate_username};

use crate::db::admins::AdminRepository;
use crate::db::users::UserRepository;
use crate::models::account::{Admin, User};

/// Profile text given to every new user.
pub const DEFAULT_BIO: &str = "Bio of Example";
/// Avatar path given to every new user, served from the media directory.
pub const DEFAULT_AVATAR: &str = "media/avatar.png";

/// A successful registration or login: the account plus its fresh token.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: IssuedToken,
}

/// A successful admin login.
#[derive(Debug)]
pub struct AuthenticatedAdmin {
    pub admin: Admin,
    pub token: IssuedToken,
}

/// Authentication service for the user role.
pub struct UserAuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenCodec,
}

impl<'a> UserAuthService<'a> {
    /// Create a new user authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenCodec) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// The password is hashed immediately and the raw value discarded; only
    /// the hash is persisted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidData` if any field fails its shape check.
    /// Returns `AuthError::AccountExists` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let email = validate_registration(email, username, password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, username, &password_hash, DEFAULT_BIO, DEFAULT_AVATAR)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::Conflict(_) => AuthError::AccountExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue(&user.email)?;

        Ok(AuthenticatedUser { user, token })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidData` if the fields fail their shape check.
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password - deliberately the same error for both, so callers
    /// cannot enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let email = validate_login(email, password)?;

        let row = self
            .users
            .get_with_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &row.password_hash)?;

        let token = self.tokens.issue(&row.user.email)?;

        Ok(AuthenticatedUser {
            user: row.user,
            token,
        })
    }

    /// Re-mint a token for an already-guarded user ("get current user").
    ///
    /// The caller's identity was just re-resolved by the session guard, so
    /// this issues a fresh token with the full TTL window from the current
    /// email alone.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if issuing fails.
    pub fn refresh_identity(&self, user: User) -> Result<AuthenticatedUser, AuthError> {
        let token = self.tokens.issue(&user.email)?;
        Ok(AuthenticatedUser { user, token })
    }
}

/// Authentication service for the admin role.
pub struct AdminAuthService<'a> {
    admins: AdminRepository<'a>,
    tokens: &'a TokenCodec,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenCodec) -> Self {
        Self {
            admins: AdminRepository::new(pool),
            tokens,
        }
    }

    /// Login with email and password.
    ///
    /// The record must exist with `is_active && is_staff` before the hash is
    /// even compared; every failure mode surfaces the identical
    /// `InvalidCredentials` error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidData` or `AuthError::InvalidCredentials`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedAdmin, AuthError> {
        let email = validate_login(email, password)?;

        let row = self
            .admins
            .get_with_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !row.admin.is_authorized() {
            return Err(AuthError::InvalidCredentials);
        }

        verify_password(password, &row.password_hash)?;

        let token = self.tokens.issue(&row.admin.email)?;

        Ok(AuthenticatedAdmin {
            admin: row.admin,
            token,
        })
    }

    /// Register a new admin (caller must already have passed the admin
    /// guard). New admins are created active staff.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidData` if any field fails its shape check.
    /// Returns `AuthError::AccountExists` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Admin, AuthError> {
        let email = validate_registration(email, username, password)?;
        let password_hash = hash_password(password)?;

        let admin = self
            .admins
            .create(&email, username, &password_hash)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::Conflict(_) => AuthError::AccountExists,
                other => AuthError::Repository(other),
            })?;

        Ok(admin)
    }
}

// =============================================================================
// Shared mechanics
// =============================================================================

/// Shape checks for registration: email form, username 5..=15, password
/// 8..=16. Runs before any store access.
fn validate_registration(
    email: &str,
    username: &str,
    password: &str,
) -> Result<Email, AuthError> {
    validate_username(username).map_err(|_| AuthError::InvalidData)?;
    validate_login(email, password)
}

/// Shape checks for login: email form and password length.
fn validate_login(email: &str, password: &str) -> Result<Email, AuthError> {
    let email = Email::parse(email).map_err(|_| AuthError::InvalidData)?;
    validate_password(password).map_err(|_| AuthError::InvalidData)?;
    Ok(email)
}

/// Hash a password with argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("password1").unwrap();
        assert_ne!(hash, "password1"); // never the raw password
        assert!(verify_password("password1", &hash).is_ok());
        assert!(matches!(
            verify_password("password2", &hash).unwrap_err(),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("password1").unwrap();
        let b = hash_password("password1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_registration_shape_checks() {
        // Valid
        assert!(validate_registration("a@b.com", "alice", "password1").is_ok());

        // Bad email shape
        assert!(validate_registration("a-at-b.com", "alice", "password1").is_err());
        assert!(validate_registration("a@nodot", "alice", "password1").is_err());

        // Username bounds (5..=15)
        assert!(validate_registration("a@b.com", "ali", "password1").is_err());
        assert!(validate_registration("a@b.com", &"a".repeat(16), "password1").is_err());

        // Password bounds (8..=16)
        assert!(validate_registration("a@b.com", "alice", "short").is_err());
        assert!(validate_registration("a@b.com", "alice", &"p".repeat(17)).is_err());
    }

    #[test]
    fn test_login_shape_checks() {
        assert!(validate_login("a@b.com", "password1").is_ok());
        assert!(validate_login("", "password1").is_err());
        assert!(validate_login("a@b.com", "short").is_err());
    }
}
