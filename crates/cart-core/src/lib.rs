//! Stock-checked, persisted shopping cart state for the storefront.
//!
//! This crate owns the shopper's cart:
//!
//! - **Cart**: ordered lines with unique products and positive amounts
//! - **CartStore**: the only mutator; checks stock, persists, publishes
//! - **Catalog**: product and stock types plus the service contracts the
//!   store consumes
//! - **Notices**: shopper-facing messages for every rejected operation
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cart_core::prelude::*;
//! use cart_cache::FileStore;
//!
//! let notices = NoticeLog::new();
//! let store = CartStore::builder(stock, catalog, Arc::new(FileStore::open(".cart")?))
//!     .notifier(notices.clone())
//!     .open()?;
//!
//! store.add_product(ProductId::new(42)).await?;
//! store.update_product_amount(ProductId::new(42), 3).await?;
//!
//! for line in store.cart().iter() {
//!     println!("{} x{}", line.title, line.amount);
//! }
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod notice;

pub use cart::{Cart, CartLine, CartSnapshot, CartStore, Outcome};
pub use error::{CartError, ServiceError};
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{
        Cart, CartLine, CartSnapshot, CartStore, CartStoreBuilder, Outcome, DEFAULT_CART_KEY,
    };
    pub use crate::catalog::{CatalogService, Product, StockQuote, StockService};
    pub use crate::error::{CartError, ServiceError};
    pub use crate::ids::ProductId;
    pub use crate::notice::{Notice, NoticeCode, NoticeLevel, NoticeLog, Notifier, NullNotifier};
}
