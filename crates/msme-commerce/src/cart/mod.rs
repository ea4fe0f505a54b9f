//! Shopping cart module.
//!
//! Contains the line item model, the persistent [`CartStore`], change
//! events, pricing, and coupons.

mod cart;
mod discount;
mod events;
mod item;
mod pricing;
mod store;

pub use cart::Cart;
pub use discount::{find_discount, AppliedDiscount, Discount, DiscountCondition, DiscountValue};
pub use events::{CartEvents, Listener, SubscriptionId};
pub use item::{CartItem, CartKey, ItemType};
pub use pricing::{CartPricing, LineItemPricing, PricingPolicy, DEFAULT_GST_RATE_BPS};
pub use store::{CartStore, DEFAULT_CART_KEY};
