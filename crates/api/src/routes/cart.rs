//! Cart route handlers.
//!
//! All cart routes are user-guarded; the cart is resolved from the
//! authenticated user's account, never from the request. A user's cart is
//! created lazily on first view.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tusport_core::ProductId;

use crate::db::carts::{CartRepository, RemoveOutcome};
use crate::db::products::ProductRepository;
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::models::cart::CartLine;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Request envelope: `{"product": {"size": ..., "color": ...}}`.
#[derive(Debug, Deserialize)]
pub struct VariantEnvelope {
    pub product: Option<VariantPayload>,
}

/// The size/color pair selecting a product variant.
#[derive(Debug, Deserialize)]
pub struct VariantPayload {
    pub size: Option<String>,
    pub color: Option<String>,
}

/// A cart line on the wire.
#[derive(Debug, Serialize)]
pub struct LineView {
    pub title: String,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    pub price: Decimal,
}

impl From<CartLine> for LineView {
    fn from(line: CartLine) -> Self {
        Self {
            title: line.title,
            quantity: line.quantity,
            size: line.size,
            color: line.color,
            price: line.price,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// View the cart. The first access creates an empty cart and answers 200;
/// later views answer 201 with the lines.
pub async fn view(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    let carts = CartRepository::new(state.pool());
    let (cart, created) = carts.get_or_create(user.id).await?;

    if created {
        return Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "cart": [] })),
        ));
    }

    let lines: Vec<LineView> = carts
        .lines(cart.id)
        .await?
        .into_iter()
        .map(LineView::from)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "cart": lines })),
    ))
}

/// Add one unit of a `(size, color)` variant of a product.
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<ProductId>,
    Json(body): Json<VariantEnvelope>,
) -> Result<impl IntoResponse> {
    let (size, color) = variant(body)?;

    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?
        .product;

    let carts = CartRepository::new(state.pool());
    let (cart, _) = carts.get_or_create(user.id).await?;

    let line = carts.add_line(cart.id, &product, &size, &color).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "product": LineView::from(line) })),
    ))
}

/// Remove one unit of a `(size, color)` variant. Removing the last unit
/// deletes the line and answers 200 with no body.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<ProductId>,
    Json(body): Json<VariantEnvelope>,
) -> Result<axum::response::Response> {
    let (size, color) = variant(body)?;

    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?
        .product;

    let carts = CartRepository::new(state.pool());
    let cart = carts
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cart line not exist".to_string()))?;

    let outcome = carts
        .remove_line(cart.id, &product, &size, &color)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("Cart line not exist".to_string())
            }
            other => ApiError::Repository(other),
        })?;

    match outcome {
        RemoveOutcome::Decremented(line) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "product": LineView::from(line) })),
        )
            .into_response()),
        RemoveOutcome::Deleted => Ok(StatusCode::OK.into_response()),
    }
}

/// Unpack the variant envelope; any missing piece is the generic validation
/// failure.
fn variant(body: VariantEnvelope) -> Result<(String, String)> {
    let payload = body
        .product
        .ok_or_else(|| ApiError::Validation("Data invalid".to_string()))?;

    match (payload.size, payload.color) {
        (Some(size), Some(color)) => Ok((size, color)),
        _ => Err(ApiError::Validation("Data invalid".to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_requires_both_fields() {
        let body: VariantEnvelope =
            serde_json::from_str(r#"{"product": {"size": "M", "color": "red"}}"#).unwrap();
        let (size, color) = variant(body).unwrap();
        assert_eq!(size, "M");
        assert_eq!(color, "red");

        let body: VariantEnvelope = serde_json::from_str(r#"{"product": {"size": "M"}}"#).unwrap();
        assert!(variant(body).is_err());

        let body: VariantEnvelope = serde_json::from_str("{}").unwrap();
        assert!(variant(body).is_err());
    }

    #[test]
    fn test_line_view_wire_shape() {
        let view = LineView {
            title: "Trail shoe".to_string(),
            quantity: 2,
            size: "42".to_string(),
            color: "red".to_string(),
            price: Decimal::new(9998, 2),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["price"], "99.98");
    }
}
