//! Shopping cart model.
//!
//! A [`Cart`] is an insertion-ordered list of [`CartLine`]s. Lines are
//! identified by their [`LineKey`], the pair of product ID and optional
//! variant: the same product in two variants (or with and without a variant)
//! occupies two lines.
//!
//! # Invariants
//!
//! - No two lines share a key.
//! - Every line has a quantity of at least one; a line whose quantity drops
//!   to zero is removed.
//! - [`Cart::count`] and [`Cart::total`] are computed from the lines on every
//!   call, so they can never drift from the cart contents.
//!
//! Serialized carts are a bare JSON array of lines. Deserializing an array
//! that breaks the invariants fails, so a corrupt record is never admitted.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub id: ProductId,
    pub variant: Option<String>,
}

impl LineKey {
    #[must_use]
    pub const fn new(id: ProductId, variant: Option<String>) -> Self {
        Self { id, variant }
    }
}

/// A product snapshot held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub available: bool,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl CartLine {
    fn new(product: Product, variant: Option<String>, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            available: product.available,
            quantity,
            variant,
        }
    }

    /// Whether this line has the given identity.
    #[must_use]
    pub fn matches(&self, id: ProductId, variant: Option<&str>) -> bool {
        self.id == id && self.variant.as_deref() == variant
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.id, self.variant.clone())
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.price.times(self.quantity)
    }

    fn refresh(&mut self, product: Product) {
        self.name = product.name;
        self.price = product.price;
        self.image = product.image;
        self.available = product.available;
    }
}

/// Why a serialized cart was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartDataError {
    #[error("line for product {0} has quantity 0")]
    ZeroQuantity(ProductId),

    #[error("duplicate line for product {0} (variant {1:?})")]
    DuplicateLine(ProductId, Option<String>),
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

/// Convert a requested (possibly fractional) quantity into a whole quantity.
///
/// The value is floored; anything below one (including NaN) becomes one.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // float-to-int `as` saturates
pub fn requested_quantity(raw: f64) -> i64 {
    if raw.is_nan() {
        return 1;
    }
    (raw.floor() as i64).max(1)
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Find the line with the given identity.
    #[must_use]
    pub fn line(&self, id: ProductId, variant: Option<&str>) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(id, variant))
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_price).sum()
    }

    /// Add `quantity` units of `product` in `variant`.
    ///
    /// The quantity is clamped to at least one. An existing line with the
    /// same key grows by that amount and takes the passed product's name,
    /// price, image and availability; otherwise a new line is appended.
    pub fn add_line(&mut self, product: Product, variant: Option<String>, quantity: i64) {
        let quantity = clamp_quantity(quantity.max(1));

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product.id, variant.as_deref()))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            line.refresh(product);
            return;
        }

        self.lines.push(CartLine::new(product, variant, quantity));
    }

    /// Replace the quantity of a line; zero or less removes it.
    ///
    /// Returns `false` (and does nothing) if no line matches.
    pub fn set_quantity(&mut self, id: ProductId, variant: Option<&str>, quantity: i64) -> bool {
        let Some(index) = self.position(id, variant) else {
            return false;
        };

        if quantity <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = clamp_quantity(quantity);
        }
        true
    }

    /// Remove a line. Returns `false` if no line matches.
    pub fn remove_line(&mut self, id: ProductId, variant: Option<&str>) -> bool {
        match self.position(id, variant) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empty the cart, returning the lines it held.
    pub fn clear(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    fn position(&self, id: ProductId, variant: Option<&str>) -> Option<usize> {
        self.lines.iter().position(|line| line.matches(id, variant))
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity).unwrap_or(if quantity < 0 { 0 } else { u32::MAX })
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartDataError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0 {
                return Err(CartDataError::ZeroQuantity(line.id));
            }
            if !seen.insert(line.key()) {
                return Err(CartDataError::DuplicateLine(line.id, line.variant.clone()));
            }
        }
        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
