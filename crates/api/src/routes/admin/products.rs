//! Product administration handlers.
//!
//! Unlike the public surface, the admin view includes inactive and
//! out-of-stock products and renders taxonomy references with their ids.
//! Image routes accept a multipart `image` field up to 5 MiB.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tusport_core::{CategoryId, ProductId, SubcategoryId};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::db::products::{ProductInput, ProductRepository};
use crate::db::subcategories::SubcategoryRepository;
use crate::error::{ApiError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::product::ProductWithRefs;
use crate::routes::products::PageQuery;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Request envelope: `{"product": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: Option<ProductPayload>,
}

/// Product fields accepted on create and update.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub id_category: Option<CategoryId>,
    pub id_subcategory: Option<SubcategoryId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub colors: Option<String>,
    pub size: Option<String>,
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
    pub stock: Option<i32>,
}

/// Taxonomy rendered with id and name; the name is `null` for a dangling
/// reference.
#[derive(Debug, Serialize)]
pub struct RefView {
    pub id: i32,
    pub name: Option<String>,
}

/// A product as shown on the admin surface.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub category: RefView,
    pub subcategory: RefView,
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
    pub is_active: bool,
    pub stock: i32,
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
            category: RefView {
                id: row.product.category_id.as_i32(),
                name: row.category_title,
            },
            subcategory: RefView {
                id: row.product.subcategory_id.as_i32(),
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
            is_active: row.product.is_active,
            stock: row.product.stock,
        }
    }
}

/// Unpack the product envelope into a validated [`ProductInput`], checking
/// that the referenced category and subcategory exist.
async fn validated_input(state: &AppState, body: ProductEnvelope) -> Result<ProductInput> {
    let payload = body
        .product
        .ok_or_else(|| ApiError::Validation("Data invalid".to_string()))?;

    let (
        Some(category_id),
        Some(subcategory_id),
        Some(title),
        Some(size),
        Some(price),
        Some(is_active),
        Some(stock),
    ) = (
        payload.id_category,
        payload.id_subcategory,
        payload.title,
        payload.size,
        payload.price,
        payload.is_active,
        payload.stock,
    )
    else {
        return Err(ApiError::Validation("Data invalid".to_string()));
    };

    let category = CategoryRepository::new(state.pool()).get(category_id).await?;
    let subcategory = SubcategoryRepository::new(state.pool())
        .get(subcategory_id)
        .await?;
    if category.is_none() || subcategory.is_none() {
        return Err(ApiError::NotFound(
            "Category or Subcategory invalid".to_string(),
        ));
    }

    Ok(ProductInput {
        category_id,
        subcategory_id,
        title,
        description: payload.description,
        colors: payload.colors,
        size,
        price,
        is_active,
        stock,
    })
}

// =============================================================================
// Read Handlers
// =============================================================================

/// List products ordered by stock, including inactive ones.
pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let products: Vec<ProductView> = ProductRepository::new(state.pool())
        .list(page.limit(), page.offset())
        .await?
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "products": products })),
    ))
}

/// Case-insensitive title search.
pub async fn filter(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Data invalid".to_string()));
    }

    let products: Vec<ProductView> = ProductRepository::new(state.pool())
        .filter_by_title(&name)
        .await?
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "products": products })),
    ))
}

/// A single product, with its taxonomy references resolved.
pub async fn detail(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let row = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?;

    if row.category_title.is_none() || row.subcategory_title.is_none() {
        return Err(ApiError::NotFound(
            "Error in category or subcategory data".to_string(),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "product": ProductView::from(row) })),
    ))
}

/// The four gallery image slots of a product.
pub async fn images(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let row = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "images": {
                "one": row.product.image_one,
                "two": row.product.image_two,
                "three": row.product.image_three,
                "four": row.product.image_four,
            }
        })),
    ))
}

// =============================================================================
// Write Handlers
// =============================================================================

/// Create a product. The thumbnail starts at the placeholder image until
/// one is uploaded.
pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Json(body): Json<ProductEnvelope>,
) -> Result<impl IntoResponse> {
    let input = validated_input(&state, body).await?;

    let repo = ProductRepository::new(state.pool());
    let product = repo.create(&input).await?;

    let row = repo
        .get(product.id)
        .await?
        .ok_or_else(|| ApiError::Internal("created product vanished".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "product": ProductView::from(row) })),
    ))
}

/// Replace every editable field of a product.
pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductEnvelope>,
) -> Result<impl IntoResponse> {
    let input = validated_input(&state, body).await?;

    let repo = ProductRepository::new(state.pool());
    repo.update(id, &input).await.map_err(not_exist)?;

    let row = repo
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "product": ProductView::from(row) })),
    ))
}

/// Store an uploaded thumbnail and persist its path.
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    repo.get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?;

    let path = state.media().save_image(multipart).await?;
    repo.set_thumbnail(id, &path).await.map_err(not_exist)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "image": path })),
    ))
}

/// Store an uploaded image into one of the four gallery slots.
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path((id, number)): Path<(ProductId, u8)>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    if !(1..=4).contains(&number) {
        return Err(ApiError::Validation("Data invalid".to_string()));
    }

    let repo = ProductRepository::new(state.pool());
    repo.get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not exist".to_string()))?;

    let path = state.media().save_image(multipart).await?;
    repo.set_image(id, number, &path).await.map_err(not_exist)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "image": path })),
    ))
}

/// Delete a product.
pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_exist)?;

    Ok(StatusCode::OK)
}

fn not_exist(e: RepositoryError) -> ApiError {
    match e {
        RepositoryError::NotFound => ApiError::NotFound("Product not exist".to_string()),
        other => ApiError::Repository(other),
    }
}
