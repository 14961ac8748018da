//! Product card: optimistic stock reservation before adding to the cart.
//!
//! A card reserves one unit from the catalog *before* touching the cart, so
//! the cart never holds a line the catalog did not agree to hold.
//!
//! ```text
//! Idle --add--> Reserving --ok--------> Idle       (cart line +1, stock updated)
//!                         --409-------> OutOfStock (stock 0, unavailable)
//!                         --failure---> Idle       (nothing changes)
//! ```
//!
//! [`ProductCard::add_to_cart`] takes `&mut self`, so a second reservation for
//! the same card cannot start while one is in flight.

use shopease_core::{Product, ProductDetail, ProductSummary};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::catalog::{CatalogError, Inventory};
use crate::error::add_breadcrumb;
use crate::services::cart::CartStore;

/// Errors from card interactions that never reach the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// The product does not offer the requested variant.
    #[error("'{variant}' is not a variant of {product}")]
    UnknownVariant { product: String, variant: String },
}

/// Client-visible card state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardState {
    #[default]
    Idle,
    Reserving,
    /// The catalog refused a reservation; terminal for this card.
    OutOfStock,
}

/// Why an add attempt was not made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    OutOfStock,
    VariantRequired,
}

/// Result of [`ProductCard::add_to_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// One unit was reserved and added to the cart.
    Added { stock: u32 },
    /// The catalog reported the product as sold out.
    Rejected,
    /// The reservation failed for another reason; nothing changed.
    Failed,
    /// The attempt was not allowed; no request was made.
    Blocked(Blocked),
}

/// A product as shown on a card, with its locally tracked stock.
#[derive(Debug, Clone)]
pub struct ProductCard {
    product: Product,
    category: Option<String>,
    variants: Vec<String>,
    selected_variant: Option<String>,
    stock: u32,
    locally_available: bool,
    state: CardState,
}

impl From<ProductSummary> for ProductCard {
    fn from(summary: ProductSummary) -> Self {
        let product = summary.product();
        Self::new(product, summary.category, summary.variants, summary.quantity)
    }
}

impl From<ProductDetail> for ProductCard {
    fn from(detail: ProductDetail) -> Self {
        let product = detail.product();
        Self::new(product, detail.category, detail.variants, detail.quantity)
    }
}

impl ProductCard {
    #[must_use]
    pub fn new(
        product: Product,
        category: Option<String>,
        variants: Vec<String>,
        stock: u32,
    ) -> Self {
        let locally_available = product.available;
        Self {
            product,
            category,
            variants,
            selected_variant: None,
            stock,
            locally_available,
            state: CardState::Idle,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    #[must_use]
    pub fn selected_variant(&self) -> Option<&str> {
        self.selected_variant.as_deref()
    }

    /// Locally displayed stock.
    #[must_use]
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    #[must_use]
    pub const fn state(&self) -> CardState {
        self.state
    }

    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.locally_available && self.stock > 0
    }

    #[must_use]
    pub fn requires_variant(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Whether an add attempt would be made right now.
    #[must_use]
    pub fn can_add(&self) -> bool {
        self.blocked().is_none()
    }

    fn blocked(&self) -> Option<Blocked> {
        if !self.is_in_stock() {
            Some(Blocked::OutOfStock)
        } else if self.requires_variant() && self.selected_variant.is_none() {
            Some(Blocked::VariantRequired)
        } else {
            None
        }
    }

    /// Select one of the product's variants.
    ///
    /// # Errors
    ///
    /// Returns `CardError::UnknownVariant` if the product has no such variant.
    pub fn select_variant(&mut self, variant: &str) -> Result<(), CardError> {
        if !self.variants.iter().any(|v| v == variant) {
            return Err(CardError::UnknownVariant {
                product: self.product.name.clone(),
                variant: variant.to_string(),
            });
        }
        self.selected_variant = Some(variant.to_string());
        Ok(())
    }

    /// Reserve one unit and, if the catalog agrees, add it to `cart`.
    ///
    /// The cart is only touched after a successful reservation. Failures
    /// never propagate: they are reported through the returned outcome.
    #[instrument(skip_all, fields(product_id = %self.product.id))]
    pub async fn add_to_cart(&mut self, inventory: &impl Inventory, cart: &CartStore) -> AddOutcome {
        if let Some(reason) = self.blocked() {
            return AddOutcome::Blocked(reason);
        }

        let id = self.product.id;
        let reserved = {
            let _reserving = Reserving::enter(&mut self.state);
            inventory.reserve_one(id).await
        };

        match reserved {
            Ok(level) => {
                self.stock = level
                    .quantity
                    .unwrap_or_else(|| self.stock.saturating_sub(1));

                cart.add_line(self.product.clone(), self.selected_variant.clone(), 1);

                let id = self.product.id.to_string();
                add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
                info!(stock = self.stock, "Reserved and added to cart");

                AddOutcome::Added { stock: self.stock }
            }
            Err(CatalogError::Conflict(_)) => {
                self.stock = 0;
                self.locally_available = false;
                self.state = CardState::OutOfStock;

                info!("Catalog reports product sold out");
                AddOutcome::Rejected
            }
            Err(e) => {
                warn!(error = %e, "Stock reservation failed");
                AddOutcome::Failed
            }
        }
    }
}

/// Holds a card in `Reserving` for the duration of a reservation call.
///
/// Dropping it (including when the caller drops the pending future) puts
/// the card back to `Idle`.
struct Reserving<'a> {
    state: &'a mut CardState,
}

impl<'a> Reserving<'a> {
    fn enter(state: &'a mut CardState) -> Self {
        *state = CardState::Reserving;
        Self { state }
    }
}

impl Drop for Reserving<'_> {
    fn drop(&mut self) {
        *self.state = CardState::Idle;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;
    use std::time::Duration;

    use shopease_core::{Price, ProductId};

    use super::*;
    use crate::catalog::StockLevel;
    use crate::services::testing::{FakeInventory, product};
    use crate::storage::MemoryStorage;

    fn card(id: i64, stock: u32) -> ProductCard {
        ProductCard::new(product(id, 1000), None, Vec::new(), stock)
    }

    fn store() -> CartStore {
        CartStore::restore(MemoryStorage::new())
    }

    #[tokio::test]
    async fn test_conflict_marks_out_of_stock_and_leaves_cart() {
        let inventory = FakeInventory::new().with_stock(5, 0);
        let cart = store();
        let mut card = card(5, 2);

        let outcome = card.add_to_cart(&inventory, &cart).await;

        assert_eq!(outcome, AddOutcome::Rejected);
        assert_eq!(card.stock(), 0);
        assert!(!card.is_in_stock());
        assert_eq!(card.state(), CardState::OutOfStock);
        assert!(cart.snapshot().line(ProductId::new(5), None).is_none());
    }

    #[tokio::test]
    async fn test_success_uses_reported_stock_and_adds_one() {
        let inventory = FakeInventory::new().with_stock(7, 4);
        let cart = store();
        let mut card = card(7, 4);

        let outcome = card.add_to_cart(&inventory, &cart).await;

        assert_eq!(outcome, AddOutcome::Added { stock: 3 });
        assert_eq!(card.stock(), 3);
        assert_eq!(card.state(), CardState::Idle);

        let snapshot = cart.snapshot();
        let line = snapshot.line(ProductId::new(7), None).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(cart.total(), Price::from_cents(1000));
    }

    #[tokio::test]
    async fn test_missing_quantity_decrements_locally() {
        let inventory = FakeInventory::new().with_stock(8, 10).without_reported_quantity();
        let cart = store();
        let mut card = card(8, 2);

        assert_eq!(card.add_to_cart(&inventory, &cart).await, AddOutcome::Added { stock: 1 });
        assert_eq!(card.add_to_cart(&inventory, &cart).await, AddOutcome::Added { stock: 0 });
        assert_eq!(
            card.add_to_cart(&inventory, &cart).await,
            AddOutcome::Blocked(Blocked::OutOfStock)
        );
        assert_eq!(cart.count(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_changes_nothing() {
        let inventory = FakeInventory::new().failing_reservations();
        let cart = store();
        let mut card = card(9, 5);

        let outcome = card.add_to_cart(&inventory, &cart).await;

        assert_eq!(outcome, AddOutcome::Failed);
        assert_eq!(card.stock(), 5);
        assert!(card.is_in_stock());
        assert_eq!(card.state(), CardState::Idle);
        assert!(cart.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_variant_required_before_reserving() {
        let inventory = FakeInventory::new().with_stock(1, 5);
        let cart = store();
        let mut card = ProductCard::new(
            product(1, 1000),
            Some("clothing".to_string()),
            vec!["M".to_string(), "L".to_string()],
            5,
        );

        assert_eq!(
            card.add_to_cart(&inventory, &cart).await,
            AddOutcome::Blocked(Blocked::VariantRequired)
        );
        assert_eq!(inventory.reservations(), 0);

        assert!(card.select_variant("XL").is_err());
        card.select_variant("M").unwrap();
        assert!(card.can_add());

        assert_eq!(card.add_to_cart(&inventory, &cart).await, AddOutcome::Added { stock: 4 });
        assert!(cart.snapshot().line(ProductId::new(1), Some("M")).is_some());
    }

    #[tokio::test]
    async fn test_unavailable_product_never_reserves() {
        let inventory = FakeInventory::new().with_stock(2, 5);
        let cart = store();
        let mut unavailable = product(2, 1000);
        unavailable.available = false;
        let mut card = ProductCard::new(unavailable, None, Vec::new(), 5);

        assert_eq!(
            card.add_to_cart(&inventory, &cart).await,
            AddOutcome::Blocked(Blocked::OutOfStock)
        );
        assert_eq!(inventory.reservations(), 0);
    }

    struct StalledInventory;

    impl Inventory for StalledInventory {
        fn reserve_one(
            &self,
            _id: ProductId,
        ) -> impl Future<Output = Result<StockLevel, CatalogError>> + Send {
            std::future::pending()
        }

        fn release(
            &self,
            _id: ProductId,
            _amount: u32,
        ) -> impl Future<Output = Result<(), CatalogError>> + Send {
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn test_abandoned_reservation_returns_card_to_idle() {
        let cart = store();
        let mut card = card(4, 3);

        let attempt = tokio::time::timeout(
            Duration::from_millis(10),
            card.add_to_cart(&StalledInventory, &cart),
        )
        .await;

        assert!(attempt.is_err());
        assert_eq!(card.state(), CardState::Idle);
        assert!(card.can_add());
        assert_eq!(card.stock(), 3);
        assert!(cart.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_stock_is_terminal_for_the_card() {
        let inventory = FakeInventory::new().with_stock(3, 0);
        let cart = store();
        let mut card = card(3, 1);

        assert_eq!(card.add_to_cart(&inventory, &cart).await, AddOutcome::Rejected);
        assert_eq!(
            card.add_to_cart(&inventory, &cart).await,
            AddOutcome::Blocked(Blocked::OutOfStock)
        );
        assert_eq!(inventory.reservations(), 1);
    }
}
