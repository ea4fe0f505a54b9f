//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in pricing and checkout.
///
/// The cart store itself never surfaces these: reads and writes fail soft.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Checkout was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Invalid discount code.
    #[error("Invalid discount code: {0}")]
    InvalidDiscountCode(String),

    /// Discount expired or not yet active.
    #[error("Discount expired: {0}")]
    DiscountExpired(String),

    /// The cart does not satisfy a discount condition.
    #[error("Discount {code} not applicable: {reason}")]
    DiscountConditionNotMet { code: String, reason: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<msme_cache::CacheError> for CommerceError {
    fn from(e: msme_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
