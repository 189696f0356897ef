//! Catalog taxonomy types.

use sqlx::FromRow;

use tusport_core::{CategoryId, SubcategoryId};

/// A top-level product category.
///
/// Titles are normalized to uppercase on create and edit.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

/// A product subcategory.
///
/// Subcategories exist independently of categories; the
/// `categories_subcategories` link table records which subcategories a
/// category offers.
#[derive(Debug, Clone, FromRow)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub title: String,
}
