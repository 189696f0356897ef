//! Account domain types.
//!
//! Users and admins are two disjoint tables - there is no shared account
//! hierarchy. The password hash never leaves the repository layer except to
//! be compared at login.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use tusport_core::{AdminId, Email, UserId};

/// A storefront user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique, case-sensitive as stored).
    pub email: Email,
    /// Display name.
    pub username: String,
    /// Free-form profile text.
    pub bio: String,
    /// Profile image path or URL.
    pub image: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// An admin account.
///
/// Both flags must be true for the account to authenticate or to pass the
/// admin session guard.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    /// Unique admin ID.
    pub id: AdminId,
    /// Admin's email address (unique).
    pub email: Email,
    /// Display name.
    pub username: String,
    /// Account is enabled.
    pub is_active: bool,
    /// Account has staff privileges.
    pub is_staff: bool,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
}

impl Admin {
    /// Whether this admin may authenticate and pass the session guard.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.is_active && self.is_staff
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn admin(is_active: bool, is_staff: bool) -> Admin {
        Admin {
            id: AdminId::new(1),
            email: Email::parse("admin@tusport.example").unwrap(),
            username: "admin".to_string(),
            is_active,
            is_staff,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_requires_both_flags() {
        assert!(admin(true, true).is_authorized());
        assert!(!admin(true, false).is_authorized());
        assert!(!admin(false, true).is_authorized());
        assert!(!admin(false, false).is_authorized());
    }
}
