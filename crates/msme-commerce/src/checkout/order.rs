//! Order types.

use crate::cart::{CartItem, CartPricing};
use crate::ids::OrderId;
use serde::{Deserialize, Serialize};

/// A placed order: the cart rows and their pricing at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Rows as they were in the cart.
    pub items: Vec<CartItem>,
    /// Pricing breakdown.
    pub pricing: CartPricing,
    /// Unix timestamp of checkout.
    pub placed_at: i64,
}

impl Order {
    /// Snapshot a priced cart as a new order.
    pub fn new(items: Vec<CartItem>, pricing: CartPricing) -> Self {
        Self {
            id: OrderId::generate(),
            items,
            pricing,
            placed_at: current_timestamp(),
        }
    }

    /// Service and space rows.
    pub fn bookings(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|i| i.item_type.is_booking())
    }

    /// Product rows.
    pub fn purchases(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|i| !i.item_type.is_booking())
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::PricingPolicy;
    use crate::money::Money;

    fn order() -> Order {
        let items = vec![
            CartItem::product("p1", "Shampoo", Money::from_rupees(250)).with_quantity(2),
            CartItem::service("s1", "Haircut", Money::from_rupees(400)),
            CartItem::space("v1", "Meeting room", Money::from_rupees(1200)),
        ];
        let pricing = CartPricing::calculate(&items, &PricingPolicy::default()).unwrap();
        Order::new(items, pricing)
    }

    #[test]
    fn test_split_bookings_and_purchases() {
        let order = order();
        assert_eq!(order.bookings().count(), 2);
        assert_eq!(order.purchases().count(), 1);
        assert_eq!(order.item_count(), 4);
    }

    #[test]
    fn test_new_order_snapshots_cart() {
        let order = order();
        assert!(order.id.as_str().starts_with("ORD-"));
        assert!(order.placed_at > 0);
        assert_eq!(order.pricing.subtotal, Money::from_rupees(2100));
    }
}
