//! Session guard extractors.
//!
//! One guard algorithm serves both roles; the roles differ only in data
//! (which codec verifies the token, which table resolves the account, and
//! the admin's extra flag predicate), so the shared steps live in
//! [`verify_claims`] and each role is an axum `FromRequestParts` extractor
//! over it.
//!
//! Per request the guard:
//! 1. extracts the bearer token - the `Authorization` header must carry the
//!    literal `"Bearer "` prefix;
//! 2. verifies it against the role's codec (signature + expiry);
//! 3. re-resolves the account by the email claim from the store. This read
//!    happens on every guarded request even though the token already names
//!    the account: it is the freshness check that makes a deactivated
//!    admin's still-unexpired token stop working immediately.
//!
//! Any failure is terminal for the request: 401, empty body, no detail.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     CurrentUser(user): CurrentUser,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use tusport_core::Email;

use crate::db::admins::AdminRepository;
use crate::db::users::UserRepository;
use crate::error::ApiError;
use crate::models::account::{Admin, User};
use crate::services::auth::{Claims, TokenCodec};
use crate::state::AppState;

/// Extractor that requires a valid user token.
pub struct CurrentUser(pub User);

/// Extractor that requires a valid admin token with both role flags set.
pub struct CurrentAdmin(pub Admin);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = verify_claims(parts, state.user_tokens())?;

        let user = UserRepository::new(state.pool())
            .get_by_email(&email)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = verify_claims(parts, state.admin_tokens())?;

        let admin = AdminRepository::new(state.pool())
            .get_by_email(&email)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if !admin.is_authorized() {
            return Err(ApiError::Unauthorized);
        }

        Ok(Self(admin))
    }
}

/// Steps 1-2 of the guard, shared by both roles: bearer extraction and
/// token verification against the role's codec.
fn verify_claims(parts: &Parts, codec: &TokenCodec) -> Result<Email, ApiError> {
    let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;

    let Claims { sub, .. } = codec.verify(token).map_err(|_| ApiError::Unauthorized)?;

    Email::parse(&sub).map_err(|_| ApiError::Unauthorized)
}

/// Extract the bearer token from the `Authorization` header.
///
/// The literal prefix `"Bearer "` is required; anything else (missing
/// header, lowercase scheme, no space) is rejected.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api-rest/users");
        if let Some(v) = value {
            builder = builder.header("authorization", v);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_rejected() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        assert_eq!(bearer_token(&parts_with_auth(Some("bearer abc"))), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Token abc"))), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Bearerabc"))), None);
    }
}
