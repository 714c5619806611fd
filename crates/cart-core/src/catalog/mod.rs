//! Product catalog module.
//!
//! Contains the catalog and stock types the cart consumes, and the service
//! contracts used to look them up.

mod product;
mod service;

pub use product::{Product, StockQuote};
pub use service::{CatalogService, StockService};

#[cfg(test)]
pub(crate) use service::{MockCatalogService, MockStockService};
