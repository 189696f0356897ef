//! Category administration handlers, including category-subcategory links.
//!
//! Category titles are normalized to uppercase on create and edit; lookups
//! by title use the normalized form.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use tusport_core::{CategoryId, SubcategoryId};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::db::subcategories::SubcategoryRepository;
use crate::error::{ApiError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::catalog::{Category, Subcategory};
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Request envelope: `{"category": {"name": ...}}`.
#[derive(Debug, Deserialize)]
pub struct CategoryEnvelope {
    pub category: Option<NamePayload>,
}

/// Request envelope: `{"subcategory": {"id_subcategory": ...}}`.
#[derive(Debug, Deserialize)]
pub struct LinkEnvelope {
    pub subcategory: Option<LinkPayload>,
}

#[derive(Debug, Deserialize)]
pub struct NamePayload {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkPayload {
    pub id_subcategory: Option<SubcategoryId>,
}

/// A taxonomy entry on the wire: `{"id": ..., "name": ...}`.
#[derive(Debug, Serialize)]
pub struct TaxonView {
    pub id: i32,
    pub name: String,
}

impl From<Category> for TaxonView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.as_i32(),
            name: category.title,
        }
    }
}

impl From<Subcategory> for TaxonView {
    fn from(subcategory: Subcategory) -> Self {
        Self {
            id: subcategory.id.as_i32(),
            name: subcategory.title,
        }
    }
}

/// Extract and normalize the `name` from a category envelope.
pub(super) fn required_name(name: Option<NamePayload>) -> Result<String> {
    name.and_then(|n| n.name)
        .filter(|n| !n.trim().is_empty())
        .map(|n| n.to_uppercase())
        .ok_or_else(|| ApiError::Validation("Data invalid".to_string()))
}

// =============================================================================
// Category CRUD
// =============================================================================

/// List all categories.
pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
) -> Result<impl IntoResponse> {
    let categories: Vec<TaxonView> = CategoryRepository::new(state.pool())
        .list()
        .await?
        .into_iter()
        .map(TaxonView::from)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "categories": categories })),
    ))
}

/// A single category.
pub async fn detail(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not exist".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "category": TaxonView::from(category) })),
    ))
}

/// Create a category with an uppercased title.
pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Json(body): Json<CategoryEnvelope>,
) -> Result<impl IntoResponse> {
    let name = required_name(body.category)?;

    let category = CategoryRepository::new(state.pool())
        .create(&name)
        .await
        .map_err(conflict_as_exists)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "category": TaxonView::from(category) })),
    ))
}

/// Rename a category (normalized to uppercase).
pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<CategoryId>,
    Json(body): Json<CategoryEnvelope>,
) -> Result<impl IntoResponse> {
    let name = required_name(body.category)?;

    let category = CategoryRepository::new(state.pool())
        .update(id, &name)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("Category not exist".to_string()),
            other => conflict_as_exists(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "category": TaxonView::from(category) })),
    ))
}

/// Delete a category. Products referencing it are left dangling on purpose.
pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("Category not exist".to_string()),
            other => ApiError::Repository(other),
        })?;

    Ok(StatusCode::OK)
}

fn conflict_as_exists(e: RepositoryError) -> ApiError {
    match e {
        RepositoryError::Conflict(_) => ApiError::Conflict("Category already exist".to_string()),
        other => ApiError::Repository(other),
    }
}

// =============================================================================
// Category <-> subcategory links
// =============================================================================

/// Subcategories linked to a category.
pub async fn linked_subcategories(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    let repo = CategoryRepository::new(state.pool());

    repo.get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not exist".to_string()))?;

    let subcategories: Vec<TaxonView> = repo
        .linked_subcategories(id)
        .await?
        .into_iter()
        .map(TaxonView::from)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subcategories": subcategories })),
    ))
}

/// Link an existing subcategory to a category.
pub async fn link_subcategory(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<CategoryId>,
    Json(body): Json<LinkEnvelope>,
) -> Result<impl IntoResponse> {
    let subcategory_id = body
        .subcategory
        .and_then(|s| s.id_subcategory)
        .ok_or_else(|| ApiError::Validation("Data invalid".to_string()))?;

    let categories = CategoryRepository::new(state.pool());
    categories
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not exist".to_string()))?;

    let subcategory = SubcategoryRepository::new(state.pool())
        .get(subcategory_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sub category not exist".to_string()))?;

    categories
        .link_subcategory(id, subcategory_id)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                ApiError::Conflict("Sub category already linked".to_string())
            }
            other => ApiError::Repository(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subcategory": TaxonView::from(subcategory) })),
    ))
}

/// Remove a category-subcategory link.
pub async fn unlink_subcategory(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path((id, id_subcategory)): Path<(CategoryId, SubcategoryId)>,
) -> Result<impl IntoResponse> {
    CategoryRepository::new(state.pool())
        .unlink_subcategory(id, id_subcategory)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("Link not exist".to_string()),
            other => ApiError::Repository(other),
        })?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_name_uppercases() {
        let name = required_name(Some(NamePayload {
            name: Some("shoes".to_string()),
        }))
        .unwrap();
        assert_eq!(name, "SHOES");
    }

    #[test]
    fn test_required_name_rejects_missing_or_blank() {
        assert!(required_name(None).is_err());
        assert!(required_name(Some(NamePayload { name: None })).is_err());
        assert!(
            required_name(Some(NamePayload {
                name: Some("   ".to_string())
            }))
            .is_err()
        );
    }
}
