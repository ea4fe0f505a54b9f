//! Type-safe key-value storage for the MSME portal.
//!
//! Provides a simple, ergonomic API for keeping client-local state (the
//! cart, mostly) in a key-value store with automatic JSON serialization.
//! Backends are pluggable: [`MemoryStore`] for a single process and tests,
//! [`FileStore`] for state that should survive restarts.
//!
//! # Example
//!
//! ```
//! use msme_cache::{cache_key, Cache};
//!
//! let cache = Cache::open_default();
//! let key = cache_key!("msme", "cart");
//!
//! cache.set(&key, &vec!["p1", "p2"]).unwrap();
//! let items: Option<Vec<String>> = cache.get(&key).unwrap();
//! assert_eq!(items.unwrap().len(), 2);
//!
//! cache.delete(&key).unwrap();
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KeyValueStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
