//! Product domain types.

use rust_decimal::Decimal;
use sqlx::FromRow;

use tusport_core::{CategoryId, ProductId, SubcategoryId};

/// A catalog product.
///
/// `colors` and `size` are stored as space-separated strings and split into
/// lists on the public wire. `category_id`/`subcategory_id` are plain
/// references without foreign keys, so they can dangle after a taxonomy
/// delete.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: String,
    pub image_one: Option<String>,
    pub image_two: Option<String>,
    pub image_three: Option<String>,
    pub image_four: Option<String>,
    pub colors: Option<String>,
    pub size: String,
    pub price: Decimal,
    pub is_active: bool,
    pub stock: i32,
}

impl Product {
    /// Colors split into a list; `None` when the product has no color data.
    #[must_use]
    pub fn color_list(&self) -> Option<Vec<&str>> {
        self.colors
            .as_deref()
            .map(|c| c.split_whitespace().collect())
    }

    /// Sizes split into a list.
    #[must_use]
    pub fn size_list(&self) -> Vec<&str> {
        self.size.split_whitespace().collect()
    }
}

/// A product joined with its category/subcategory titles.
///
/// The names are optional: a dangling taxonomy reference yields `None`
/// rather than failing the whole listing.
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithRefs {
    #[sqlx(flatten)]
    pub product: Product,
    pub category_title: Option<String>,
    pub subcategory_title: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(colors: Option<&str>, size: &str) -> Product {
        Product {
            id: ProductId::new(1),
            category_id: CategoryId::new(1),
            subcategory_id: SubcategoryId::new(1),
            title: "Trail shoe".to_string(),
            description: None,
            thumbnail: "media/product.jpg".to_string(),
            image_one: None,
            image_two: None,
            image_three: None,
            image_four: None,
            colors: colors.map(str::to_owned),
            size: size.to_string(),
            price: Decimal::new(4999, 2),
            is_active: true,
            stock: 3,
        }
    }

    #[test]
    fn test_color_list_split() {
        let p = product(Some("red blue"), "40 41 42");
        assert_eq!(p.color_list(), Some(vec!["red", "blue"]));
        assert_eq!(p.size_list(), vec!["40", "41", "42"]);
    }

    #[test]
    fn test_color_list_absent() {
        assert_eq!(product(None, "M").color_list(), None);
    }
}
