//! Cart, pricing and checkout logic for the MSME portal.
//!
//! One cart spans three catalogues: retail products, bookable services
//! (salon and the like) and reservable spaces. This crate provides:
//!
//! - **Cart**: line items keyed by `(id, item type)`, the persistent
//!   [`CartStore`](cart::CartStore) and its change events
//! - **Pricing**: subtotal, MRP savings, coupons and GST
//! - **Checkout**: order snapshots
//!
//! # Example
//!
//! ```
//! use msme_cache::Cache;
//! use msme_commerce::prelude::*;
//!
//! let store = CartStore::new(Cache::open_default());
//! store.add_item(
//!     CartItem::service("svc-1", "Haircut", Money::from_rupees(400))
//!         .with_duration("30 min"),
//! );
//!
//! let pricing = store.pricing(&PricingPolicy::default()).unwrap();
//! assert_eq!(pricing.gst_total, Money::from_rupees(72));
//! assert_eq!(pricing.grand_total.display(), "\u{20b9}472.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Cart
    pub use crate::cart::{
        AppliedDiscount, Cart, CartEvents, CartItem, CartKey, CartPricing, CartStore, Discount,
        DiscountCondition, DiscountValue, ItemType, LineItemPricing, PricingPolicy,
        SubscriptionId,
    };

    // Checkout
    pub use crate::checkout::Order;
}
