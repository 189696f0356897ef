//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use tusport_core::{CartId, CartLineId, ProductId, UserId};

/// A shopping cart.
///
/// Created lazily on a user's first cart access; each user owns exactly one.
#[derive(Debug, Clone, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// One line in a cart.
///
/// Line identity is `(cart, product, size, color)` - the same product in a
/// different size or color is a distinct line. `price` is the denormalized
/// `unit_price * quantity`, recomputed on every mutation. Quantity is always
/// at least 1; removing the last unit deletes the row instead.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub id: CartLineId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub title: String,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    pub price: Decimal,
}

/// Line price for a given unit price and quantity.
#[must_use]
pub fn line_price(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_price_recomputed_from_unit() {
        let unit = Decimal::new(1950, 2); // 19.50
        assert_eq!(line_price(unit, 1), Decimal::new(1950, 2));
        assert_eq!(line_price(unit, 2), Decimal::new(3900, 2));
        assert_eq!(line_price(unit, 3), Decimal::new(5850, 2));
    }
}
