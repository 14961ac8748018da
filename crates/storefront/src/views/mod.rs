//! Text views rendered with Askama.
//!
//! View structs hold display-ready strings; conversions from domain types
//! live next to each view.

pub mod cart;
pub mod products;

pub use cart::{CartBadge, CartItemView, CartShowTemplate, CartView};
pub use products::{ProductShowTemplate, ProductView, ProductsIndexTemplate};

use shopease_core::Price;

/// Format a price for display, e.g. `$10.00`.
#[must_use]
pub fn format_price(price: Price) -> String {
    price.to_string()
}
