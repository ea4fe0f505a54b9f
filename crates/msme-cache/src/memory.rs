//! In-memory key-value backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{CacheError, KeyValueStore};

/// Process-local key-value store.
///
/// Clones share the same map, the way every tab of one origin sees the same
/// local storage. A quota bounds the total size of keys plus values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Create a store where every operation fails, as when storage is disabled.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Total bytes currently held (keys plus values).
    pub fn used_bytes(&self) -> usize {
        let entries = self.lock();
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable {
            return Err(CacheError::Unavailable);
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.check_available()?;
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.check_available()?;
        let mut entries = self.lock();

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > quota {
                return Err(CacheError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check_available()?;
        self.lock().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.check_available()?;
        Ok(self.lock().contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.check_available()?;
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let store = MemoryStore::new();
        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));

        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Deleting again is fine
        store.delete("a").unwrap();
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(10);
        store.set("k", b"12345").unwrap();

        let err = store.set("other", b"123456").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { quota: 10, .. }));
        assert!(!store.exists("other").unwrap());
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let store = MemoryStore::with_quota(10);
        store.set("k", b"123456789").unwrap();
        // Overwriting the same key frees the old value first
        store.set("k", b"987654321").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_unavailable_store() {
        let store = MemoryStore::unavailable();
        assert!(matches!(store.get("k"), Err(CacheError::Unavailable)));
        assert!(matches!(store.set("k", b"v"), Err(CacheError::Unavailable)));
        assert!(matches!(store.keys(), Err(CacheError::Unavailable)));
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let tab = store.clone();
        store.set("x", b"y").unwrap();
        assert_eq!(tab.keys().unwrap(), vec!["x".to_string()]);
    }
}
