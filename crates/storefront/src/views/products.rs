//! Product list and product detail views.

use askama::Template;

use super::format_price;
use crate::services::ProductCard;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub in_stock: bool,
    pub stock: u32,
    pub category: Option<String>,
    pub variants: Vec<String>,
    pub selected_variant: Option<String>,
}

impl From<&ProductCard> for ProductView {
    fn from(card: &ProductCard) -> Self {
        let product = card.product();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: format_price(product.price),
            in_stock: card.is_in_stock(),
            stock: card.stock(),
            category: card.category().map(str::to_string),
            variants: card.variants().to_vec(),
            selected_variant: card.selected_variant().map(str::to_string),
        }
    }
}

/// Product listing page template.
#[derive(Template)]
#[template(path = "products/index.txt")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub cart_count: u64,
}

impl ProductsIndexTemplate {
    #[must_use]
    pub fn new<'a>(cards: impl IntoIterator<Item = &'a ProductCard>, cart_count: u64) -> Self {
        Self {
            products: cards.into_iter().map(ProductView::from).collect(),
            cart_count,
        }
    }
}

/// Product detail page template.
#[derive(Template)]
#[template(path = "products/show.txt")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub description: Option<String>,
}

impl ProductShowTemplate {
    #[must_use]
    pub fn new(card: &ProductCard, description: Option<&str>) -> Self {
        Self {
            product: ProductView::from(card),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }
}
