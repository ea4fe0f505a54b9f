//! In-memory cart model.

use crate::cart::{CartItem, CartKey, ItemType};
use crate::ids::CatalogId;
use crate::money::Money;
use serde::{Deserialize, Deserializer, Serialize};

/// An ordered list of line items with unique `(id, item type)` keys.
///
/// Serializes as a bare JSON array of items, which is the persisted layout.
/// Deserializing folds rows with duplicate keys, so a hand-edited array still
/// yields one row per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item.
    ///
    /// If a row with the same key exists its quantity grows by the incoming
    /// quantity; otherwise the item is appended. An incoming quantity of 0
    /// counts as 1. Returns the row's resulting quantity.
    pub fn add_item(&mut self, item: CartItem) -> u32 {
        let incoming = item.quantity.max(1);

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.matches(&item.id, item.item_type))
        {
            existing.quantity = existing.quantity.saturating_add(incoming);
            return existing.quantity;
        }

        self.items.push(CartItem {
            quantity: incoming,
            ..item
        });
        incoming
    }

    /// Set a row's quantity, clamped to at least 1.
    ///
    /// Returns `false` without changing anything if the key is absent.
    pub fn update_quantity(&mut self, id: &CatalogId, item_type: ItemType, quantity: i64) -> bool {
        let clamped = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);

        match self.items.iter_mut().find(|i| i.matches(id, item_type)) {
            Some(item) => {
                item.quantity = clamped;
                true
            }
            None => false,
        }
    }

    /// Remove the row with the given key.
    pub fn remove_item(&mut self, id: &CatalogId, item_type: ItemType) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| !i.matches(id, item_type));
        self.items.len() < len_before
    }

    /// Sum of `price × quantity` over all rows. Excludes tax.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities across rows.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of distinct rows.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a row by key.
    pub fn get_item(&self, key: &CartKey) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|i| i.matches(&key.id, key.item_type))
    }

    /// Rows in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart, returning its rows.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

impl From<Vec<CartItem>> for Cart {
    /// Build a cart from raw rows, folding duplicate keys together.
    fn from(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            cart.add_item(item);
        }
        cart
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<CartItem>::deserialize(deserializer).map(Cart::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shampoo() -> CartItem {
        CartItem::product("p1", "Shampoo", Money::from_rupees(250))
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_item(shampoo());
        let qty = cart.add_item(shampoo().with_quantity(2));

        assert_eq!(qty, 3);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_same_id_different_type_is_separate_row() {
        let mut cart = Cart::new();
        cart.add_item(shampoo());
        cart.add_item(CartItem::service("p1", "Hair spa", Money::from_rupees(800)));

        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.total(), Money::from_rupees(1050));
    }

    #[test]
    fn test_zero_quantity_add_counts_as_one() {
        let mut cart = Cart::new();
        cart.add_item(shampoo().with_quantity(0));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_saturates_at_max_quantity() {
        let mut cart = Cart::new();
        cart.add_item(shampoo().with_quantity(u32::MAX));

        assert_eq!(cart.add_item(shampoo().with_quantity(3)), u32::MAX);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), u64::from(u32::MAX));
    }

    #[test]
    fn test_update_quantity_clamps() {
        let mut cart = Cart::new();
        cart.add_item(shampoo());
        let id = CatalogId::new("p1");

        assert!(cart.update_quantity(&id, ItemType::Product, 5));
        assert_eq!(cart.item_count(), 5);
        assert!(cart.update_quantity(&id, ItemType::Product, -3));
        assert_eq!(cart.item_count(), 1);
        assert!(cart.update_quantity(&id, ItemType::Product, i64::MAX));
        assert_eq!(cart.item_count(), u64::from(u32::MAX));
    }

    #[test]
    fn test_update_missing_key_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(shampoo());
        assert!(!cart.update_quantity(&CatalogId::new("p1"), ItemType::Space, 4));
        assert!(!cart.update_quantity(&CatalogId::new("p2"), ItemType::Product, 4));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(shampoo());
        assert!(!cart.remove_item(&CatalogId::new("p1"), ItemType::Service));
        assert!(cart.remove_item(&CatalogId::new("p1"), ItemType::Product));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_rows_folds_duplicates() {
        let cart = Cart::from(vec![shampoo(), shampoo().with_quantity(4)]);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_serializes_as_array() {
        let mut cart = Cart::new();
        cart.add_item(shampoo());
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "p1");
    }

    #[test]
    fn test_deserialize_folds_duplicate_rows() {
        let json = serde_json::json!([
            {"id": "p1", "itemType": "product", "name": "Shampoo", "price": 250, "quantity": 1},
            {"id": "s1", "itemType": "service", "name": "Haircut", "price": 400, "quantity": 1},
            {"id": "p1", "itemType": "product", "name": "Shampoo", "price": 250, "quantity": 2}
        ]);
        let mut cart: Cart = serde_json::from_value(json).unwrap();

        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.item_count(), 4);

        assert!(cart.remove_item(&CatalogId::new("p1"), ItemType::Product));
        assert_eq!(cart.unique_item_count(), 1);
    }
}
