//! Cart error types.

use cart_cache::CacheError;
use thiserror::Error;

use crate::ids::ProductId;

/// Failure reported by a remote collaborator (stock or catalog service).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached or answered with an error status.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a body that could not be understood.
    #[error("Invalid service response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Requested amount exceeds available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The operation targets a product that is not in the cart.
    #[error("Product not in cart: {0}")]
    NotFound(ProductId),

    /// The stock service failed.
    #[error("Stock lookup failed for {product_id}: {source}")]
    StockLookup {
        product_id: ProductId,
        #[source]
        source: ServiceError,
    },

    /// The catalog service failed.
    #[error("Catalog lookup failed for {product_id}: {source}")]
    CatalogLookup {
        product_id: ProductId,
        #[source]
        source: ServiceError,
    },

    /// The persisted cart could not be parsed at startup.
    #[error("Malformed persisted cart: {0}")]
    MalformedPersistedState(String),

    /// The durable copy could not be written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] CacheError),
}
