//! User account route handlers.
//!
//! Registration, login, and "get current user". Successful responses all
//! carry the `{user: {...}}` envelope with a freshly issued bearer token.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthenticatedUser, UserAuthService};
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Request envelope: `{"user": {...}}`.
#[derive(Debug, Deserialize)]
pub struct UserEnvelope<T> {
    pub user: Option<T>,
}

/// Registration payload. Fields are optional so a missing field surfaces as
/// the generic validation failure instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response body: `{"user": {...}}` with the profile and a fresh token.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

/// Public profile fields plus the bearer token.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub username: String,
    pub token: String,
    pub bio: String,
    pub image: String,
}

impl From<AuthenticatedUser> for UserResponse {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            user: UserProfile {
                email: auth.user.email.into_inner(),
                username: auth.user.username,
                token: auth.token.token,
                bio: auth.user.bio,
                image: auth.user.image,
            },
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<UserEnvelope<RegisterPayload>>,
) -> Result<impl IntoResponse> {
    let payload = body.user.ok_or_else(data_invalid)?;
    let (Some(email), Some(username), Some(password)) =
        (payload.email, payload.username, payload.password)
    else {
        return Err(data_invalid());
    };

    let auth = UserAuthService::new(state.pool(), state.user_tokens())
        .register(&email, &username, &password)
        .await?;

    tracing::info!(email = %auth.user.email, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(auth))))
}

/// Login with email and password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<UserEnvelope<LoginPayload>>,
) -> Result<impl IntoResponse> {
    let payload = body.user.ok_or_else(data_invalid)?;
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(data_invalid());
    };

    let auth = UserAuthService::new(state.pool(), state.user_tokens())
        .login(&email, &password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(auth))))
}

/// Get the current user's profile, re-minting their token with a full
/// expiry window.
pub async fn current(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let auth = UserAuthService::new(state.pool(), state.user_tokens()).refresh_identity(user)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(auth))))
}

fn data_invalid() -> ApiError {
    ApiError::Validation("Data invalid".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_tolerates_missing_fields() {
        let body: UserEnvelope<RegisterPayload> =
            serde_json::from_str(r#"{"user": {"email": "a@b.com"}}"#).unwrap();
        let payload = body.user.unwrap();
        assert_eq!(payload.email.as_deref(), Some("a@b.com"));
        assert!(payload.username.is_none());
        assert!(payload.password.is_none());

        let body: UserEnvelope<RegisterPayload> = serde_json::from_str("{}").unwrap();
        assert!(body.user.is_none());
    }

    #[test]
    fn test_profile_wire_shape() {
        let profile = UserResponse {
            user: UserProfile {
                email: "a@b.com".to_string(),
                username: "alice".to_string(),
                token: "tok".to_string(),
                bio: "Bio of Example".to_string(),
                image: "media/avatar.png".to_string(),
            },
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["user"]["email"], "a@b.com");
        assert_eq!(json["user"]["token"], "tok");
        assert_eq!(json["user"]["bio"], "Bio of Example");
    }
}
