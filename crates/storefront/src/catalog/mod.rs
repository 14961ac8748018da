//! Remote catalog API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The catalog is source of truth for products and stock - NO local sync
//! - No caching: stock counts change with every reservation
//!
//! # Endpoints
//!
//! ```text
//! GET   /products[?category=<name>]   - Product listing
//! GET   /products/:id                 - Product detail
//! PATCH /products/:id/decrement       - Reserve one unit (409 when exhausted)
//! PATCH /products/:id/increment       - Release units, body {"amount": n}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shopease_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let products = client.list_products(Some("clothing")).await?;
//! let stock = client.decrement(products[0].id).await?;
//! ```

mod client;

pub use client::{CatalogClient, StockLevel};

use std::future::Future;

use shopease_core::ProductId;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stock for the product is exhausted (HTTP 409).
    #[error("Out of stock: product {0}")]
    Conflict(ProductId),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot have paths appended.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// Whether the error means "no stock left" rather than a failure.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Remote stock operations used by product cards and the cart store.
///
/// [`CatalogClient`] is the production implementation; tests substitute
/// in-memory ledgers.
pub trait Inventory: Send + Sync {
    /// Reserve one unit of stock for `id`.
    ///
    /// Resolves to [`CatalogError::Conflict`] when stock is exhausted.
    fn reserve_one(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockLevel, CatalogError>> + Send;

    /// Return `amount` units of `id` to stock.
    fn release(
        &self,
        id: ProductId,
        amount: u32,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;
}

impl Inventory for CatalogClient {
    fn reserve_one(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockLevel, CatalogError>> + Send {
        self.decrement(id)
    }

    fn release(
        &self,
        id: ProductId,
        amount: u32,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send {
        self.increment(id, amount)
    }
}
