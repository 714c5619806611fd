//! The durable key-value surface the cart is mirrored into.

use crate::CacheError;

/// A durable string key-value store that survives process restarts.
///
/// Implementations are synchronous: the cart treats its local storage as
/// fast and reliable, and only remote lookups are awaited.
pub trait PersistenceStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist.
    fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous blob.
    fn write(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete the blob stored under `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists in the store.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read(key)?.is_some())
    }
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for std::sync::Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).write(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }
}
