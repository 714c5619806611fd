//! Contracts for the remote stock and catalog services.

use async_trait::async_trait;

use crate::catalog::{Product, StockQuote};
use crate::error::ServiceError;
use crate::ids::ProductId;

/// Answers "how many units of this product are available".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the current stock for a product.
    async fn get_stock(&self, product_id: ProductId) -> Result<StockQuote, ServiceError>;
}

/// Answers "what are the title, price and image of this product".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch catalog data for a product.
    async fn get_product(&self, product_id: ProductId) -> Result<Product, ServiceError>;
}
