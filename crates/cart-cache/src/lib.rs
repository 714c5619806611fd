//! Durable key-value persistence for the storefront cart.
//!
//! Provides a small storage seam ([`PersistenceStore`]) with in-memory and
//! file-backed implementations, and a typed [`Cache`] on top of it with
//! automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cart_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(Arc::new(FileStore::open(".cart")?));
//!
//! // Store a value
//! cache.set("@RocketShoes:cart", &lines)?;
//!
//! // Retrieve a value
//! let lines: Option<Vec<CartLine>> = cache.get("@RocketShoes:cart")?;
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod store;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
pub use store::PersistenceStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, MemoryStore, PersistenceStore};
}
