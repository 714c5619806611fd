//! Typed wrapper over a [`PersistenceStore`] with automatic serialization.

use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, PersistenceStore};

/// Type-safe cache backed by any [`PersistenceStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn PersistenceStore>,
}

impl Cache {
    /// Wrap a store.
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and
    /// [`CacheError::SerializeError`] if the stored blob does not parse as `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("@RocketShoes:cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.read(key)? {
            Some(blob) => {
                let value: T = serde_json::from_str(&blob)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("@RocketShoes:cart", &cart)?;
    /// ```
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let blob = serde_json::to_string(value)?;
        self.store.write(key, &blob)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: u64,
        amount: i64,
    }

    #[test]
    fn test_typed_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let cache = Cache::new(store.clone());
        let lines = vec![Line { id: 1, amount: 2 }];

        cache.set("cart", &lines).unwrap();
        let loaded: Option<Vec<Line>> = cache.get("cart").unwrap();

        assert_eq!(loaded, Some(lines));
        assert_eq!(store.read("cart").unwrap().as_deref(), Some(r#"[{"id":1,"amount":2}]"#));
    }

    #[test]
    fn test_malformed_blob_is_a_serialize_error() {
        let cache = Cache::new(Arc::new(MemoryStore::with_entry("cart", "{not json")));

        let result = cache.get::<Vec<Line>>("cart");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }
}
