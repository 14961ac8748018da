//! Cart page and cart badge views.

use askama::Template;
use shopease_core::{Cart, CartLine};

use super::format_price;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub variant: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: format_price(cart.total()),
            item_count: cart.count(),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            variant: line.variant.clone(),
            quantity: line.quantity,
            price: format_price(line.price),
            line_price: format_price(line.line_price()),
        }
    }
}

/// Cart page template.
#[derive(Template)]
#[template(path = "cart/show.txt")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart count badge template.
#[derive(Template)]
#[template(path = "partials/cart_count.txt")]
pub struct CartBadge {
    pub count: u64,
}
