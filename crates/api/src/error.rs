//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, ApiError>`.
//!
//! The error kinds form a small closed set, each mapped to its own status
//! code at the boundary. Client-attributable failures carry a JSON body of
//! the shape `{"error": [<message>]}`; guard rejections are a bare 401 with
//! no body; store failures are logged and captured but reach the client
//! only as a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::upload::UploadError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed its shape checks.
    #[error("invalid data: {0}")]
    Validation(String),

    /// Upload failed before reaching the catalog.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session guard rejected the request. Intentionally carries no detail.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire shape of every error body: a list of messages.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: Vec<String>,
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: vec![message.into()],
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry before collapsing them for the client
        if matches!(self, Self::Repository(_) | Self::Internal(_))
            || matches!(&self, Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash))
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Validation(_) | Self::Auth(AuthError::InvalidData) => {
                error_body(StatusCode::BAD_REQUEST, "Data invalid")
            }
            Self::Upload(err) => error_body(StatusCode::BAD_REQUEST, err.to_string()),
            Self::Auth(AuthError::InvalidCredentials) => error_body(
                StatusCode::UNAUTHORIZED,
                "Email or password incorrect",
            ),
            // Guard rejections: 401 with an empty body, never a reason
            Self::Unauthorized | Self::Auth(AuthError::Token(_)) => {
                StatusCode::UNAUTHORIZED.into_response()
            }
            Self::NotFound(msg) => error_body(StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => error_body(StatusCode::CONFLICT, msg),
            Self::Auth(AuthError::AccountExists) => {
                error_body(StatusCode::CONFLICT, "Email already registered")
            }
            // Driver/internal detail is logged above, never exposed
            Self::Repository(_) | Self::Internal(_) | Self::Auth(_) => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::auth::TokenError;

    fn status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes_are_distinct_per_kind() {
        assert_eq!(
            status(ApiError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(ApiError::NotFound("missing".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(ApiError::Conflict("duplicate".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(ApiError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_map_by_kind() {
        assert_eq!(
            status(ApiError::Auth(AuthError::InvalidData)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ApiError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(ApiError::Auth(AuthError::AccountExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(ApiError::Auth(AuthError::Token(TokenError::Expired))),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_guard_rejection_has_empty_body() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // No content-type header means no body was attached
        assert!(response.headers().get("content-type").is_none());
    }

    #[test]
    fn test_repository_detail_never_reaches_client() {
        let err = ApiError::Repository(RepositoryError::Conflict("pq: detail".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
