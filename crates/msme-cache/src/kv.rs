//! Key-Value store wrapper with automatic serialization.

use std::path::Path;
use std::sync::Arc;

use crate::{CacheError, FileStore, MemoryStore};
use serde::{de::DeserializeOwned, Serialize};

/// A raw byte-oriented key-value backend.
///
/// Implementations stand in for browser-local storage: string keys, opaque
/// values, no expiry and no cross-writer coordination.
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys in the store.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// Type-safe cache over a [`KeyValueStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning a `Cache` shares the backend.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Open a fresh in-memory store.
    ///
    /// # Example
    ///
    /// ```
    /// let cache = msme_cache::Cache::open_default();
    /// cache.set("greeting", &"hello").unwrap();
    /// ```
    pub fn open_default() -> Self {
        Self::with_backend(MemoryStore::new())
    }

    /// Open a file-backed store rooted at `dir`, creating it if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open("/home/me/.local/share/msme")?;
    /// ```
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::with_backend(FileStore::open(dir)?))
    }

    /// Wrap an existing backend.
    pub fn with_backend(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and a `SerializeError` if the
    /// stored bytes do not decode as `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Vec<CartItem>> = cache.get("msme:cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
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
    /// cache.set("msme:cart", &items)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Store raw bytes under a key without serialization.
    pub fn set_raw(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.backend.set(key, value)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```
/// let key = msme_cache::cache_key!("msme", "cart");
/// assert_eq!(key, "msme:cart");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Badge {
        label: String,
        count: u32,
    }

    #[test]
    fn test_set_then_get() {
        let cache = Cache::open_default();
        let badge = Badge {
            label: "cart".to_string(),
            count: 3,
        };
        cache.set("badge", &badge).unwrap();

        let loaded: Option<Badge> = cache.get("badge").unwrap();
        assert_eq!(loaded, Some(badge));
    }

    #[test]
    fn test_get_missing_key() {
        let cache = Cache::open_default();
        let loaded: Option<Badge> = cache.get("nothing-here").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_corrupt_payload() {
        let cache = Cache::open_default();
        cache.set_raw("badge", b"{not json").unwrap();

        let result: Result<Option<Badge>, _> = cache.get("badge");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_clones_share_backend() {
        let cache = Cache::open_default();
        let other = cache.clone();
        cache.set("k", &1u32).unwrap();

        assert!(other.exists("k").unwrap());
        other.delete("k").unwrap();
        assert!(!cache.exists("k").unwrap());
    }

    #[test]
    fn test_cache_key_macro() {
        let user = 42;
        assert_eq!(cache_key!("msme", "cart"), "msme:cart");
        assert_eq!(cache_key!("msme", "cart", user), "msme:cart:42");
    }
}
