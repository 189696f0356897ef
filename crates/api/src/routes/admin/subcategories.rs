//! Subcategory administration handlers.
//!
//! Same normalization rules as categories: titles are uppercased on create
//! and edit.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use tusport_core::SubcategoryId;

use crate::db::RepositoryError;
use crate::db::subcategories::SubcategoryRepository;
use crate::error::{ApiError, Result};
use crate::middleware::CurrentAdmin;
use crate::routes::admin::categories::{NamePayload, TaxonView, required_name};
use crate::state::AppState;

/// Request envelope: `{"subcategory": {"name": ...}}`.
#[derive(Debug, Deserialize)]
pub struct SubcategoryEnvelope {
    pub subcategory: Option<NamePayload>,
}

/// List all subcategories.
pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
) -> Result<impl IntoResponse> {
    let subcategories: Vec<TaxonView> = SubcategoryRepository::new(state.pool())
        .list()
        .await?
        .into_iter()
        .map(TaxonView::from)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subcategories": subcategories })),
    ))
}

/// A single subcategory.
pub async fn detail(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<SubcategoryId>,
) -> Result<impl IntoResponse> {
    let subcategory = SubcategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sub category not exist".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subcategory": TaxonView::from(subcategory) })),
    ))
}

/// Create a subcategory with an uppercased title.
pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Json(body): Json<SubcategoryEnvelope>,
) -> Result<impl IntoResponse> {
    let name = required_name(body.subcategory)?;

    let subcategory = SubcategoryRepository::new(state.pool())
        .create(&name)
        .await
        .map_err(conflict_as_exists)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subcategory": TaxonView::from(subcategory) })),
    ))
}

/// Rename a subcategory (normalized to uppercase).
pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<SubcategoryId>,
    Json(body): Json<SubcategoryEnvelope>,
) -> Result<impl IntoResponse> {
    let name = required_name(body.subcategory)?;

    let subcategory = SubcategoryRepository::new(state.pool())
        .update(id, &name)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("Sub category not exist".to_string()),
            other => conflict_as_exists(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subcategory": TaxonView::from(subcategory) })),
    ))
}

/// Delete a subcategory. Dangling product references are allowed.
pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<SubcategoryId>,
) -> Result<impl IntoResponse> {
    SubcategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("Sub category not exist".to_string()),
            other => ApiError::Repository(other),
        })?;

    Ok(StatusCode::OK)
}

fn conflict_as_exists(e: RepositoryError) -> ApiError {
    match e {
        RepositoryError::Conflict(_) => {
            ApiError::Conflict("Sub category already exist".to_string())
        }
        other => ApiError::Repository(other),
    }
}
