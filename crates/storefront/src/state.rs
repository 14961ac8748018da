//! Storefront context shared by every view.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::CartStore;
use crate::storage::FileStorage;

/// Storefront context: configuration, the catalog client and the cart.
///
/// This struct is cheaply cloneable via `Arc`; every clone shares the same
/// cart store.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartStore,
}

impl Storefront {
    /// Create the storefront, restoring the cart persisted under
    /// `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let cart = CartStore::restore(FileStorage::new(&config.data_dir));
        Self::with_cart(config, cart)
    }

    /// Create the storefront around an existing cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn with_cart(config: StorefrontConfig, cart: CartStore) -> Result<Self, AppError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                catalog,
                cart,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::testing::product;

    fn config(data_dir: &std::path::Path) -> StorefrontConfig {
        let dir = data_dir.display().to_string();
        StorefrontConfig::from_lookup(|key| (key == "SHOPEASE_DATA_DIR").then(|| dir.clone()))
            .unwrap()
    }

    #[test]
    fn test_new_restores_cart_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();

        let first = Storefront::new(config(dir.path())).unwrap();
        first.cart().add_line(product(1, 1000), None, 2);

        let second = Storefront::new(config(dir.path())).unwrap();
        assert_eq!(second.cart().count(), 2);
        assert_eq!(second.config().data_dir, dir.path());
    }

    #[test]
    fn test_clones_share_cart() {
        let dir = tempfile::tempdir().unwrap();
        let storefront = Storefront::new(config(dir.path())).unwrap();
        let clone = storefront.clone();

        storefront.cart().add_line(product(2, 500), None, 1);
        assert_eq!(clone.cart().count(), 1);
        assert_eq!(clone.catalog().base_url().as_str(), "http://localhost:8000/");
    }
}
