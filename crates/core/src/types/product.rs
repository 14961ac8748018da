//! Catalog product types.
//!
//! The catalog API returns slightly different shapes for its list and detail
//! endpoints. Both carry the [`Product`] fields the cart snapshots, plus
//! optional extras (stock, category, variants, description).

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// The product fields a cart line snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identity.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URI.
    pub image: String,
    /// Availability flag as reported by the catalog.
    pub available: bool,
}

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Selectable variants (size, color, ...). Empty when the product has none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
    /// Units in stock; the catalog may omit it, which reads as zero.
    #[serde(default)]
    pub quantity: u32,
}

/// A product as returned by `GET /products/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
    #[serde(default)]
    pub quantity: u32,
}

impl ProductSummary {
    /// The cart snapshot of this product.
    #[must_use]
    pub fn product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            available: self.available,
        }
    }

    /// Whether the catalog reports the product as purchasable right now.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.available && self.quantity > 0
    }
}

impl ProductDetail {
    /// The cart snapshot of this product.
    #[must_use]
    pub fn product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            available: self.available,
        }
    }

    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.available && self.quantity > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_optional_fields_default() {
        let summary: ProductSummary = serde_json::from_str(
            r#"{"id": 3, "name": "Mug", "price": 8, "image": "https://img/mug.png", "available": true}"#,
        )
        .unwrap();

        assert_eq!(summary.category, None);
        assert!(summary.variants.is_empty());
        assert_eq!(summary.quantity, 0);
        assert!(!summary.is_in_stock());
    }

    #[test]
    fn test_summary_with_variants_and_stock() {
        let summary: ProductSummary = serde_json::from_str(
            r#"{"id": 1, "name": "Tee", "price": 10, "image": "tee.png", "available": true,
                "category": "clothing", "variants": ["S", "M", "L"], "quantity": 4}"#,
        )
        .unwrap();

        assert_eq!(summary.category.as_deref(), Some("clothing"));
        assert_eq!(summary.variants, vec!["S", "M", "L"]);
        assert!(summary.is_in_stock());
        assert_eq!(summary.product().price, Price::from_cents(1000));
    }

    #[test]
    fn test_detail_parses_description() {
        let detail: ProductDetail = serde_json::from_str(
            r#"{"id": 9, "name": "Lamp", "price": 24.5, "image": "lamp.png", "available": false,
                "description": "Warm light", "category": "home", "quantity": 2}"#,
        )
        .unwrap();

        assert_eq!(detail.description.as_deref(), Some("Warm light"));
        assert!(!detail.is_in_stock());
        assert_eq!(detail.product().id, ProductId::new(9));
    }
}
