//! Public catalog route handlers.
//!
//! The public surface only shows active, in-stock products and renders
//! taxonomy references as bare names.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tusport_core::ProductId;

use crate::db::products::ProductRepository;
use crate::error::{ApiError, Result};
use crate::models::product::ProductWithRefs;
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    const DEFAULT_LIMIT: i64 = 10;

    /// Requested page size, defaulting to 10 and clamped at zero.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).max(0)
    }

    /// Requested offset, defaulting to 0 and clamped at zero.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Taxonomy rendered as a bare name (`null` when the reference dangles).
#[derive(Debug, Serialize)]
pub struct RefName {
    pub name: Option<String>,
}

/// A product as shown to storefront visitors.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub category: RefName,
    pub subcategory: RefName,
    pub title: String,
    pub thumbnail: String,
    pub image_one: Option<String>,
    pub image_two: Option<String>,
    pub image_three: Option<String>,
    pub image_four: Option<String>,
    pub description: Option<String>,
    pub colors: Option<Vec<String>>,
    pub size: Vec<String>,
    pub price: Decimal,
}

impl From<ProductWithRefs> for ProductView {
    fn from(row: ProductWithRefs) -> Self {
        let colors = row
            .product
            .color_list()
            .map(|c| c.into_iter().map(str::to_owned).collect());
        let size = row
            .product
            .size_list()
            .into_iter()
            .map(str::to_owned)
            .collect();

        Self {
            id: row.product.id,
            category: RefName {
                name: row.category_title,
            },
            subcategory: RefName {
                name: row.subcategory_title,
            },
            title: row.product.title,
            thumbnail: row.product.thumbnail,
            image_one: row.product.image_one,
            image_two: row.product.image_two,
            image_three: row.product.image_three,
            image_four: row.product.image_four,
            description: row.product.description,
            colors,
            size,
            price: row.product.price,
        }
    }
}

/// Browse the catalog: active, in-stock products.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool())
        .list_active(page.limit(), page.offset())
        .await?;

    let products: Vec<ProductView> = products.into_iter().map(ProductView::from).collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "products": products })),
    ))
}

/// A single publicly visible product.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get_active(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "product": ProductView::from(product) })),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let page = PageQuery {
            limit: None,
            offset: None,
        };
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_query_clamps_negatives() {
        let page = PageQuery {
            limit: Some(-5),
            offset: Some(-1),
        };
        assert_eq!(page.limit(), 0);
        assert_eq!(page.offset(), 0);
    }
}
