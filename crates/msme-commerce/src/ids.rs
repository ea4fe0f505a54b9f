//! Newtype IDs for type-safe identifiers.
//!
//! A catalogue id alone does not identify a cart row (see
//! [`CartKey`](crate::cart::CartKey)); the newtypes keep it from being
//! confused with order or discount ids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a product, service or space in its catalogue.
    CatalogId
);
define_id!(
    /// Identifier of a placed order.
    OrderId
);

impl OrderId {
    /// Generate a new order number, e.g. `ORD-18f3a9c2b41-0007`.
    pub fn generate() -> Self {
        Self(format!("ORD-{}", generate_suffix()))
    }
}

/// Build a unique suffix from the clock and a process-wide counter.
fn generate_suffix() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{:x}-{:04}", millis, counter % 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = CatalogId::new("p1");
        assert_eq!(id.as_str(), "p1");
    }

    #[test]
    fn test_order_id_generation() {
        let id1 = OrderId::generate();
        let id2 = OrderId::generate();
        assert!(id1.as_str().starts_with("ORD-"));
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = CatalogId::new("svc-haircut");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""svc-haircut""#);
    }

    #[test]
    fn test_id_equality() {
        let id1 = CatalogId::new("same");
        let id2: CatalogId = "same".into();
        let id3 = CatalogId::new("different");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }
}
