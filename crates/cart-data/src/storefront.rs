//! The storefront REST API as stock and catalog services.

use async_trait::async_trait;
use cart_core::catalog::{CatalogService, Product, StockQuote, StockService};
use cart_core::{ProductId, ServiceError};
use serde::Deserialize;

use crate::client::{FetchClient, FetchError};
use crate::dependency::DependencyTag;

/// Body of `GET /stock/{id}`. Only `amount` is required; an echoed `id` is
/// ignored in favour of the id that was asked for.
#[derive(Debug, Deserialize)]
struct StockBody {
    amount: i64,
}

/// Client for the storefront API (`/stock/{id}`, `/products/{id}`, `/products`).
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    fetch: FetchClient,
}

impl StorefrontClient {
    /// Create a client for the API at `base_url` with default policies.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self::from_fetch(FetchClient::new(base_url)?))
    }

    /// Wrap an already configured fetch client.
    pub fn from_fetch(fetch: FetchClient) -> Self {
        Self { fetch }
    }

    pub fn fetch_client(&self) -> &FetchClient {
        &self.fetch
    }

    /// Available stock for a product.
    pub async fn stock(&self, product_id: ProductId) -> Result<StockQuote, FetchError> {
        let body: StockBody = self
            .fetch
            .fetch(&format!("stock/{}", product_id), DependencyTag::Inventory)
            .await?;
        Ok(StockQuote::new(product_id, body.amount))
    }

    /// Catalog data for a product.
    pub async fn product(&self, product_id: ProductId) -> Result<Product, FetchError> {
        self.fetch
            .fetch(&format!("products/{}", product_id), DependencyTag::Catalog)
            .await
    }

    /// Every product in the catalog.
    pub async fn list_products(&self) -> Result<Vec<Product>, FetchError> {
        self.fetch.fetch("products", DependencyTag::Listing).await
    }
}

#[async_trait]
impl StockService for StorefrontClient {
    async fn get_stock(&self, product_id: ProductId) -> Result<StockQuote, ServiceError> {
        Ok(self.stock(product_id).await?)
    }
}

#[async_trait]
impl CatalogService for StorefrontClient {
    async fn get_product(&self, product_id: ProductId) -> Result<Product, ServiceError> {
        Ok(self.product(product_id).await?)
    }
}

impl From<FetchError> for ServiceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Deserialization(_) => ServiceError::InvalidResponse(e.to_string()),
            _ => ServiceError::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_body_needs_only_amount() {
        let body: StockBody = serde_json::from_str(r#"{"amount":5}"#).unwrap();
        assert_eq!(body.amount, 5);

        let body: StockBody = serde_json::from_str(r#"{"id":3,"amount":0}"#).unwrap();
        assert_eq!(body.amount, 0);
    }

    #[test]
    fn test_fetch_error_mapping() {
        let err: ServiceError = FetchError::Deserialization("missing field `amount`".into()).into();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));

        let err: ServiceError = FetchError::Http {
            status: 404,
            url: "http://localhost:3333/stock/9".into(),
        }
        .into();
        assert_eq!(
            err,
            ServiceError::Unavailable("HTTP error: 404 for http://localhost:3333/stock/9".into())
        );
    }
}
