//! Credential shape rules shared by registration and login.
//!
//! These are deliberately minimal pre-conditions checked before any store
//! access. A violation short-circuits the request with a generic "Data
//! invalid" response - field-level detail is never surfaced to clients.

use thiserror::Error;

/// Minimum username length (inclusive).
pub const USERNAME_MIN: usize = 5;
/// Maximum username length (inclusive).
pub const USERNAME_MAX: usize = 15;
/// Minimum password length (inclusive).
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length (inclusive).
pub const PASSWORD_MAX: usize = 16;

/// A credential field failed its shape check.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// Username outside 5..=15 characters.
    #[error("username must be between {USERNAME_MIN} and {USERNAME_MAX} characters")]
    UsernameLength,
    /// Password outside 8..=16 characters.
    #[error("password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters")]
    PasswordLength,
}

/// Validate a username's length. No character-class rules apply.
///
/// # Errors
///
/// Returns [`CredentialError::UsernameLength`] when outside 5..=15 characters.
pub fn validate_username(username: &str) -> Result<(), CredentialError> {
    let len = username.chars().count();
    if (USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        Ok(())
    } else {
        Err(CredentialError::UsernameLength)
    }
}

/// Validate a password's length. There is no complexity requirement.
///
/// # Errors
///
/// Returns [`CredentialError::PasswordLength`] when outside 8..=16 characters.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    let len = password.chars().count();
    if (PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        Ok(())
    } else {
        Err(CredentialError::PasswordLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_bounds() {
        assert!(validate_username("abcd").is_err()); // 4
        assert!(validate_username("abcde").is_ok()); // 5
        assert!(validate_username("a".repeat(15).as_str()).is_ok());
        assert!(validate_username("a".repeat(16).as_str()).is_err());
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("1234567").is_err()); // 7
        assert!(validate_password("12345678").is_ok()); // 8
        assert!(validate_password("1234567812345678").is_ok()); // 16
        assert!(validate_password("12345678123456789").is_err()); // 17
    }

    #[test]
    fn test_no_complexity_rules() {
        assert!(validate_password("aaaaaaaa").is_ok());
        assert!(validate_username("      ").is_ok()); // 6 chars, no class rules
    }
}
