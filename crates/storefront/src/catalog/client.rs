//! Catalog API client implementation.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use shopease_core::{ProductDetail, ProductId, ProductSummary};
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;
use crate::config::CatalogConfig;

/// Remaining stock reported by the catalog after a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockLevel {
    /// Units left, when the response carried a usable `quantity`.
    pub quantity: Option<u32>,
}

impl StockLevel {
    /// Read the `quantity` field of a stock response.
    ///
    /// Anything other than a non-negative integer counts as "not reported".
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        Self {
            quantity: body
                .get("quantity")
                .and_then(Value::as_u64)
                .and_then(|q| u32::try_from(q).ok()),
        }
    }
}

#[derive(Serialize)]
struct IncrementBody {
    amount: u32,
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `<base>/<segments...>`, keeping any path prefix of the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    ///
    /// 404 and 409 map to `NotFound` and `Conflict`; every other non-success
    /// status becomes `Api`.
    async fn send(
        &self,
        request: RequestBuilder,
        id: Option<ProductId>,
    ) -> Result<String, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        match (status, id) {
            (StatusCode::CONFLICT, Some(id)) => Err(CatalogError::Conflict(id)),
            (StatusCode::NOT_FOUND, Some(id)) => {
                Err(CatalogError::NotFound(format!("product {id}")))
            }
            _ => {
                tracing::warn!(
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "Catalog API returned non-success status"
                );
                Err(CatalogError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(200).collect(),
                })
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ProductSummary>, CatalogError> {
        let mut url = self.endpoint(&["products"])?;
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            url.query_pairs_mut().append_pair("category", category);
        }

        let body = self.send(self.inner.client.get(url), None).await?;
        let products: Vec<ProductSummary> = serde_json::from_str(&body)?;

        debug!(count = products.len(), "Fetched product list");
        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let id_segment = id.to_string();
        let url = self.endpoint(&["products", id_segment.as_str()])?;
        let body = self.send(self.inner.client.get(url), Some(id)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Stock Methods
    // =========================================================================

    /// Reserve one unit of stock.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if the product is out of stock, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn decrement(&self, id: ProductId) -> Result<StockLevel, CatalogError> {
        let id_segment = id.to_string();
        let url = self.endpoint(&["products", id_segment.as_str(), "decrement"])?;
        let body = self.send(self.inner.client.patch(url), Some(id)).await?;

        // A success without a JSON body still reserved the unit
        let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let level = StockLevel::from_body(&value);
        debug!(remaining = ?level.quantity, "Reserved one unit");
        Ok(level)
    }

    /// Return `amount` units to stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the catalog rejects it.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn increment(&self, id: ProductId, amount: u32) -> Result<(), CatalogError> {
        let id_segment = id.to_string();
        let url = self.endpoint(&["products", id_segment.as_str(), "increment"])?;
        let request = self
            .inner
            .client
            .patch(url)
            .json(&IncrementBody { amount });

        self.send(request, Some(id)).await?;
        debug!(amount, "Released stock");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let url = client("http://localhost:8000")
            .endpoint(&["products", "7", "decrement"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/products/7/decrement");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let with_slash = client("https://shop.example.com/api/").endpoint(&["products"]).unwrap();
        let without = client("https://shop.example.com/api").endpoint(&["products"]).unwrap();

        assert_eq!(with_slash.as_str(), "https://shop.example.com/api/products");
        assert_eq!(without.as_str(), "https://shop.example.com/api/products");
    }

    #[test]
    fn test_stock_level_reads_integer_quantity() {
        assert_eq!(StockLevel::from_body(&json!({"id": 7, "quantity": 3})).quantity, Some(3));
        assert_eq!(StockLevel::from_body(&json!({"quantity": 0})).quantity, Some(0));
    }

    #[test]
    fn test_stock_level_ignores_unusable_quantity() {
        assert_eq!(StockLevel::from_body(&json!({"quantity": "3"})).quantity, None);
        assert_eq!(StockLevel::from_body(&json!({"quantity": -1})).quantity, None);
        assert_eq!(StockLevel::from_body(&json!({"ok": true})).quantity, None);
        assert_eq!(StockLevel::from_body(&json!([1, 2])).quantity, None);
    }
}
