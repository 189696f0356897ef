//! Admin route handlers.
//!
//! Everything here except login requires the admin session guard, which in
//! turn requires the account to still carry `is_active && is_staff` at
//! request time.

pub mod categories;
pub mod products;
pub mod subcategories;
pub mod users;
