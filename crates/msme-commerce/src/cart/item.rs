//! Cart line items.

use crate::ids::CatalogId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalogue a line item's id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A retail product.
    Product,
    /// A salon or other bookable service.
    Service,
    /// A venue or space reservation.
    Space,
}

impl ItemType {
    /// All item types, in display order.
    pub const ALL: [ItemType; 3] = [ItemType::Product, ItemType::Service, ItemType::Space];

    /// Lowercase name, matching the persisted form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Product => "product",
            ItemType::Service => "service",
            ItemType::Space => "space",
        }
    }

    /// Parse a persisted or user-supplied name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "product" => Some(ItemType::Product),
            "service" => Some(ItemType::Service),
            "space" => Some(ItemType::Space),
            _ => None,
        }
    }

    /// Services and spaces are bookings rather than purchases.
    pub fn is_booking(&self) -> bool {
        matches!(self, ItemType::Service | ItemType::Space)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::from_name(s)
            .ok_or_else(|| format!("unknown item type '{}' (expected product, service or space)", s))
    }
}

/// The `(id, item type)` pair identifying one cart row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartKey {
    /// Catalogue id.
    pub id: CatalogId,
    /// Catalogue the id belongs to.
    pub item_type: ItemType,
}

impl CartKey {
    /// Create a key.
    pub fn new(id: impl Into<CatalogId>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            item_type,
        }
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_type, self.id)
    }
}

/// A line item in the cart.
///
/// Display fields and price are snapshots taken when the item was added;
/// they are never re-read from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalogue id.
    pub id: CatalogId,
    /// Catalogue the id belongs to.
    pub item_type: ItemType,
    /// Display name.
    pub name: String,
    /// Image URL or path.
    #[serde(default)]
    pub image: String,
    /// Unit price.
    pub price: Money,
    /// Pre-discount price, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Service duration, e.g. "45 min".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Space location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Space capacity in people.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Product brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Product seller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
}

impl CartItem {
    /// Create an item with quantity 1 and no metadata.
    pub fn new(
        id: impl Into<CatalogId>,
        item_type: ItemType,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            item_type,
            name: name.into(),
            image: String::new(),
            price,
            original_price: None,
            quantity: 1,
            duration: None,
            location: None,
            capacity: None,
            brand: None,
            seller: None,
        }
    }

    /// A retail product.
    pub fn product(id: impl Into<CatalogId>, name: impl Into<String>, price: Money) -> Self {
        Self::new(id, ItemType::Product, name, price)
    }

    /// A bookable service.
    pub fn service(id: impl Into<CatalogId>, name: impl Into<String>, price: Money) -> Self {
        Self::new(id, ItemType::Service, name, price)
    }

    /// A space reservation.
    pub fn space(id: impl Into<CatalogId>, name: impl Into<String>, price: Money) -> Self {
        Self::new(id, ItemType::Space, name, price)
    }

    /// The row's composite key.
    pub fn key(&self) -> CartKey {
        CartKey::new(self.id.clone(), self.item_type)
    }

    /// Whether this row has the given composite key.
    pub fn matches(&self, id: &CatalogId, item_type: ItemType) -> bool {
        self.item_type == item_type && &self.id == id
    }

    /// `price × quantity`, clamped at the numeric bounds.
    pub fn line_total(&self) -> Money {
        self.price.saturating_mul(self.quantity)
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the pre-discount price.
    pub fn with_original_price(mut self, original_price: Money) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Set the service duration.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Set the space location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the space capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the product brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the product seller.
    pub fn with_seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = Some(seller.into());
        self
    }
}
