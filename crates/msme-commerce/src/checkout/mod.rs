//! Checkout module.
//!
//! Turns a priced cart into an order snapshot.

mod order;

pub use order::Order;
