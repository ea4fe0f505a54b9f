//! Persistent cart store.

use std::sync::{Mutex, PoisonError};

use msme_cache::Cache;
use tracing::{debug, info, warn};

use crate::cart::{Cart, CartEvents, CartItem, CartKey, CartPricing, ItemType, PricingPolicy, SubscriptionId};
use crate::checkout::Order;
use crate::error::CommerceError;
use crate::ids::CatalogId;
use crate::money::Money;

/// Storage key used when none is given.
pub const DEFAULT_CART_KEY: &str = "msme:cart";

/// The authoritative cart, persisted under one key of a [`Cache`].
///
/// Every operation is a read-modify-write against the cache, so a fresh
/// store over the same backend sees exactly what the last write left.
/// Reads and mutations never fail: unreadable data is treated as an empty
/// cart and failed writes are logged and dropped. Successful writes publish a
/// change signal on the store's [`CartEvents`].
///
/// Stores sharing a backend do not coordinate. Two writers interleaving
/// read-modify-write cycles lose updates (last write wins).
///
/// # Example
///
/// ```
/// use msme_cache::Cache;
/// use msme_commerce::prelude::*;
///
/// let store = CartStore::new(Cache::open_default());
/// store.add_item(CartItem::product("p1", "Shampoo", Money::from_rupees(250)));
/// store.add_item(CartItem::product("p1", "Shampoo", Money::from_rupees(250)));
///
/// assert_eq!(store.item_count(), 2);
/// assert_eq!(store.total(), Money::from_rupees(500));
/// ```
#[derive(Debug)]
pub struct CartStore {
    cache: Cache,
    key: String,
    events: CartEvents,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl CartStore {
    /// Create a store over `cache` using [`DEFAULT_CART_KEY`].
    pub fn new(cache: Cache) -> Self {
        Self::with_key(cache, DEFAULT_CART_KEY)
    }

    /// Create a store over `cache` using a custom key.
    pub fn with_key(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
            events: CartEvents::new(),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Publish changes on a shared event registry instead of a private one.
    pub fn with_events(mut self, events: CartEvents) -> Self {
        self.events = events;
        self
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The event registry changes are published on.
    pub fn events(&self) -> &CartEvents {
        &self.events
    }

    /// Current rows, read from storage.
    pub fn items(&self) -> Vec<CartItem> {
        self.load().into_items()
    }

    /// Current cart, read from storage.
    pub fn cart(&self) -> Cart {
        self.load()
    }

    /// Get a row by key.
    pub fn get_item(&self, key: &CartKey) -> Option<CartItem> {
        self.load().get_item(key).cloned()
    }

    /// Add an item, merging with an existing row of the same key.
    pub fn add_item(&self, item: CartItem) {
        let mut cart = self.load();
        let (id, item_type) = (item.id.clone(), item.item_type);
        let quantity = cart.add_item(item);

        if self.save(&cart) {
            debug!(key = %self.key, %id, %item_type, quantity, "added item to cart");
        }
    }

    /// Set a row's quantity, clamped to at least 1.
    ///
    /// Returns `false` if no row has that key; nothing is written then.
    pub fn update_quantity(&self, id: &CatalogId, item_type: ItemType, quantity: i64) -> bool {
        let mut cart = self.load();
        if !cart.update_quantity(id, item_type, quantity) {
            debug!(key = %self.key, %id, %item_type, "quantity update for missing item ignored");
            return false;
        }

        if self.save(&cart) {
            debug!(key = %self.key, %id, %item_type, requested = quantity, "updated item quantity");
        }
        true
    }

    /// Remove a row. Returns `false` if no row has that key.
    pub fn remove_item(&self, id: &CatalogId, item_type: ItemType) -> bool {
        let mut cart = self.load();
        if !cart.remove_item(id, item_type) {
            return false;
        }

        if self.save(&cart) {
            debug!(key = %self.key, %id, %item_type, "removed item from cart");
        }
        true
    }

    /// Empty the cart.
    pub fn clear(&self) {
        if self.save(&Cart::new()) {
            debug!(key = %self.key, "cleared cart");
        }
    }

    /// Sum of `price × quantity`. Tax is left to the caller (see [`CartPricing`]).
    pub fn total(&self) -> Money {
        self.load().total()
    }

    /// Sum of quantities, for badge displays.
    pub fn item_count(&self) -> u64 {
        self.load().item_count()
    }

    /// Number of distinct rows.
    pub fn unique_item_count(&self) -> usize {
        self.load().unique_item_count()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    /// Price the cart under `policy`.
    pub fn pricing(&self, policy: &PricingPolicy) -> Result<CartPricing, CommerceError> {
        CartPricing::calculate(self.load().items(), policy)
    }

    /// Place an order for the current contents and empty the cart.
    ///
    /// Unlike the other mutations this reports failures: an empty cart, a
    /// rejected coupon, or a failed write of the emptied cart all return an
    /// error and leave the cart as it was.
    pub fn checkout(&self, policy: &PricingPolicy) -> Result<Order, CommerceError> {
        let cart = self.load();
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let pricing = CartPricing::calculate(cart.items(), policy)?;
        let order = Order::new(cart.into_items(), pricing);

        self.cache.set(&self.key, &Cart::new())?;
        info!(
            key = %self.key,
            order_id = %order.id,
            grand_total = %order.pricing.grand_total,
            "checked out cart"
        );
        self.events.publish();

        Ok(order)
    }

    /// Register a change listener owned by this store.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.events.subscribe(listener);
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id);
        id
    }

    /// Remove a change listener.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|s| *s != id);
        self.events.unsubscribe(id)
    }

    /// Tear the store down, dropping the listeners it registered.
    ///
    /// Listeners registered directly on a shared [`CartEvents`] are left in
    /// place; persisted data is untouched.
    pub fn dispose(self) {
        let subscriptions = self
            .subscriptions
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        for id in subscriptions {
            self.events.unsubscribe(id);
        }
        debug!(key = %self.key, "disposed cart store");
    }

    fn load(&self) -> Cart {
        match self.cache.get::<Cart>(&self.key) {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "unreadable cart data, treating as empty");
                Cart::new()
            }
        }
    }

    /// Persist and notify. Returns whether the write succeeded.
    fn save(&self, cart: &Cart) -> bool {
        match self.cache.set(&self.key, cart) {
            Ok(()) => {
                self.events.publish();
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to persist cart");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msme_cache::MemoryStore;

    fn shampoo() -> CartItem {
        CartItem::product("p1", "Shampoo", Money::from_rupees(250))
    }

    #[test]
    fn test_example_scenario() {
        let store = CartStore::new(Cache::open_default());
        let p1 = CatalogId::new("p1");

        store.add_item(shampoo());
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].price, Money::from_rupees(250));
        assert_eq!(store.total(), Money::from_rupees(250));

        store.add_item(shampoo());
        assert_eq!(store.items()[0].quantity, 2);
        assert_eq!(store.total(), Money::from_rupees(500));

        assert!(store.update_quantity(&p1, ItemType::Product, 0));
        assert_eq!(store.items()[0].quantity, 1);

        assert!(store.remove_item(&p1, ItemType::Product));
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_custom_key() {
        let cache = Cache::open_default();
        let store = CartStore::with_key(cache.clone(), "tenant-7:cart");
        store.add_item(shampoo());

        assert!(cache.exists("tenant-7:cart").unwrap());
        assert!(!cache.exists(DEFAULT_CART_KEY).unwrap());
    }

    #[test]
    fn test_unavailable_storage_reads_empty() {
        let store = CartStore::new(Cache::with_backend(MemoryStore::unavailable()));
        store.add_item(shampoo());

        assert!(store.items().is_empty());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.total(), Money::zero());
    }

    #[test]
    fn test_checkout_empty_cart() {
        let store = CartStore::new(Cache::open_default());
        let result = store.checkout(&PricingPolicy::default());
        assert!(matches!(result, Err(CommerceError::EmptyCart)));
    }
}
