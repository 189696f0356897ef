//! Admin account route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::middleware::CurrentAdmin;
use crate::routes::users::UserEnvelope;
use crate::services::auth::AdminAuthService;
use crate::state::AppState;

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response: `{"user": {email, username, token}}` - no profile
/// fields, admins have none.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub user: AdminProfile,
}

#[derive(Debug, Serialize)]
pub struct AdminProfile {
    pub email: String,
    pub username: String,
    pub token: String,
}

/// Admin login. Issues a token from the admin signing domain.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<UserEnvelope<LoginPayload>>,
) -> Result<impl IntoResponse> {
    let payload = body.user.ok_or_else(data_invalid)?;
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(data_invalid());
    };

    let auth = AdminAuthService::new(state.pool(), state.admin_tokens())
        .login(&email, &password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            user: AdminProfile {
                email: auth.admin.email.into_inner(),
                username: auth.admin.username,
                token: auth.token.token,
            },
        }),
    ))
}

/// Register a new admin. Only an existing, authorized admin can do this.
pub async fn register(
    State(state): State<AppState>,
    CurrentAdmin(actor): CurrentAdmin,
    Json(body): Json<UserEnvelope<RegisterPayload>>,
) -> Result<impl IntoResponse> {
    let payload = body.user.ok_or_else(data_invalid)?;
    let (Some(email), Some(username), Some(password)) =
        (payload.email, payload.username, payload.password)
    else {
        return Err(data_invalid());
    };

    let admin = AdminAuthService::new(state.pool(), state.admin_tokens())
        .register(&email, &username, &password)
        .await?;

    tracing::info!(new_admin = %admin.email, by = %actor.email, "admin registered");

    Ok(StatusCode::CREATED)
}

fn data_invalid() -> ApiError {
    ApiError::Validation("Data invalid".to_string())
}
