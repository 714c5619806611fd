//! In-process store for tests and throwaway sessions.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{CacheError, PersistenceStore};

/// A [`PersistenceStore`] kept entirely in memory.
///
/// Writes can be made to fail on demand, which lets callers exercise their
/// behavior when local storage rejects a write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    fail_writes: RwLock<bool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.write().insert(key.into(), value.into());
        store
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write() = fail;
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        if *self.fail_writes.read() {
            return Err(CacheError::StoreError(format!("write rejected for {}", key)));
        }
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.read("missing").unwrap(), None);
        assert!(!store.exists("missing").unwrap());
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        store.write("cart", "[]").unwrap();

        assert_eq!(store.read("cart").unwrap().as_deref(), Some("[]"));
        assert!(store.exists("cart").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::with_entry("cart", "[]");
        store.delete("cart").unwrap();
        store.delete("cart").unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn test_failing_writes_keep_previous_value() {
        let store = MemoryStore::with_entry("cart", "old");
        store.set_fail_writes(true);

        let result = store.write("cart", "new");
        assert!(matches!(result, Err(CacheError::StoreError(_))));
        assert_eq!(store.read("cart").unwrap().as_deref(), Some("old"));

        store.set_fail_writes(false);
        store.write("cart", "new").unwrap();
        assert_eq!(store.read("cart").unwrap().as_deref(), Some("new"));
    }
}
