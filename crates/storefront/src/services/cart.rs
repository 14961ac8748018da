//! The cart store: single source of truth for cart contents.
//!
//! A [`CartStore`] is an explicit handle, cheap to clone, passed to every
//! view and product card that needs the cart. Each mutation is applied to the
//! in-memory [`Cart`] and then written to durable storage; a failed write is
//! logged and the in-memory cart stays authoritative.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use shopease_core::{Cart, CartLine, Price, Product, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::catalog::Inventory;
use crate::storage::{CartStorage, StorageError};

/// Outcome of [`CartStore::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearReport {
    /// Lines whose stock was returned to the catalog.
    pub released: usize,
    /// Lines whose release call failed (their reservation is leaked).
    pub failed: usize,
}

/// Shared cart state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    cart: Mutex<Cart>,
    storage: Box<dyn CartStorage>,
}

impl CartStore {
    /// Open a store backed by `storage`, restoring any persisted cart.
    ///
    /// A missing, unreadable or malformed record yields an empty cart.
    pub fn restore(storage: impl CartStorage + 'static) -> Self {
        let cart = match storage.load() {
            Ok(Some(record)) => serde_json::from_str::<Cart>(&record).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding malformed cart record");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart record, starting empty");
                Cart::new()
            }
        };

        debug!(lines = cart.len(), "Cart restored");

        Self {
            inner: Arc::new(CartStoreInner {
                cart: Mutex::new(cart),
                storage: Box::new(storage),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // Cart mutations cannot leave the cart half-updated, so a poisoned
        // lock still guards a consistent cart.
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the cart and persist the result.
    fn mutate<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut cart = self.lock();
        let result = f(&mut cart);
        self.persist(&cart);
        result
    }

    fn persist(&self, cart: &Cart) {
        let written = serde_json::to_string(cart)
            .map_err(StorageError::from)
            .and_then(|record| self.inner.storage.save(&record));

        if let Err(e) = written {
            warn!(error = %e, "Failed to persist cart, keeping in-memory copy");
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines().to_vec()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lock().count()
    }

    /// Sum of line prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lock().total()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` (at least one) units of `product` in `variant`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_line(&self, product: Product, variant: Option<String>, quantity: i64) {
        self.mutate(|cart| cart.add_line(product, variant, quantity));
    }

    /// Replace a line's quantity; zero or less removes the line.
    ///
    /// Returns `false` if no line matched.
    #[instrument(skip(self))]
    pub fn set_quantity(&self, id: ProductId, variant: Option<&str>, quantity: i64) -> bool {
        self.mutate(|cart| cart.set_quantity(id, variant, quantity))
    }

    /// Remove a line. Returns `false` if no line matched.
    #[instrument(skip(self))]
    pub fn remove_line(&self, id: ProductId, variant: Option<&str>) -> bool {
        self.mutate(|cart| cart.remove_line(id, variant))
    }

    /// Return every held unit to the catalog, then empty the cart.
    ///
    /// The lines are snapshotted when the call starts and one release is sent
    /// per line, concurrently. Failed releases are logged and counted; the
    /// cart is emptied once every call has settled, whatever the outcome.
    #[instrument(skip_all)]
    pub async fn clear(&self, inventory: &impl Inventory) -> ClearReport {
        let held = self.lines();

        let results = join_all(
            held.iter()
                .map(|line| inventory.release(line.id, line.quantity)),
        )
        .await;

        let mut report = ClearReport::default();
        for (line, result) in held.iter().zip(results) {
            match result {
                Ok(()) => report.released += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        product_id = %line.id,
                        quantity = line.quantity,
                        error = %e,
                        "Failed to release reserved stock"
                    );
                }
            }
        }

        self.mutate(|cart| {
            cart.clear();
        });

        info!(
            released = report.released,
            failed = report.failed,
            "Cart cleared"
        );
        report
    }
}
