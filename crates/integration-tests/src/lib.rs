//! Integration tests for ShopEase.
//!
//! Tests run the storefront library against a `wiremock` catalog and a
//! temporary data directory; nothing outside the test process is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopease-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - Catalog API requests and error mapping
//! - `cart_flow` - Reservation, cart persistence and clear-with-release

use std::path::Path;

use serde_json::{Value, json};
use shopease_storefront::config::StorefrontConfig;
use shopease_storefront::state::Storefront;
use tempfile::TempDir;
use wiremock::MockServer;

/// A mock catalog plus a private data directory.
pub struct TestContext {
    pub catalog: MockServer,
    pub data_dir: TempDir,
}

impl TestContext {
    /// Start a mock catalog and create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        Self {
            catalog: MockServer::start().await,
            data_dir: tempfile::tempdir().expect("Failed to create data directory"),
        }
    }

    /// Configuration pointing at the mock catalog and the data directory.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid base URL.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        config_for(&self.catalog.uri(), self.data_dir.path())
    }

    /// A storefront wired to the mock catalog, restoring any cart saved in
    /// the data directory.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be built.
    #[must_use]
    pub fn storefront(&self) -> Storefront {
        Storefront::new(self.config()).expect("Failed to build storefront")
    }
}

/// Configuration for a catalog at `base_url` and carts under `data_dir`.
///
/// # Panics
///
/// Panics if `base_url` is not a valid base URL.
#[must_use]
pub fn config_for(base_url: &str, data_dir: &Path) -> StorefrontConfig {
    let base_url = base_url.to_string();
    let data_dir = data_dir.display().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "SHOPEASE_API_BASE_URL" => Some(base_url.clone()),
        "SHOPEASE_DATA_DIR" => Some(data_dir.clone()),
        _ => None,
    })
    .expect("Invalid test configuration")
}

/// A catalog product body as served by `GET /products/:id`.
#[must_use]
pub fn product_json(id: i64, name: &str, price: f64, quantity: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "image": format!("https://img.example/{id}.png"),
        "available": quantity > 0,
        "quantity": quantity,
    })
}
