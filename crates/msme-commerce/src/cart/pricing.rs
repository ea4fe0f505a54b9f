//! Cart pricing calculations.
//!
//! The cart store only knows `price × quantity`. Tax and coupons are a
//! caller policy, applied here.

use crate::cart::{AppliedDiscount, CartItem, Discount, ItemType};
use crate::error::CommerceError;
use crate::ids::CatalogId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Flat GST rate applied at checkout, in basis points (18%).
pub const DEFAULT_GST_RATE_BPS: u32 = 1800;

/// How a cart is priced.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// GST rate in basis points.
    pub gst_rate_bps: u32,
    /// Coupon to apply, if any.
    pub discount: Option<Discount>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            gst_rate_bps: DEFAULT_GST_RATE_BPS,
            discount: None,
        }
    }
}

impl PricingPolicy {
    /// Policy with a custom GST rate and no coupon.
    pub fn with_gst_rate(gst_rate_bps: u32) -> Self {
        Self {
            gst_rate_bps,
            discount: None,
        }
    }

    /// Apply a coupon.
    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = Some(discount);
        self
    }
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of `price × quantity`.
    pub subtotal: Money,
    /// Amount saved against original prices (MRP), for display.
    pub savings: Money,
    /// Applied coupon.
    pub discount: Option<AppliedDiscount>,
    /// Coupon amount off the subtotal.
    pub discount_total: Money,
    /// Subtotal after the coupon; the GST base.
    pub taxable_amount: Money,
    /// GST rate in basis points.
    pub gst_rate_bps: u32,
    /// GST amount.
    pub gst_total: Money,
    /// Final total (subtotal - discount + GST).
    pub grand_total: Money,
    /// Per-line-item pricing breakdown.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Price `items` under `policy`.
    ///
    /// Returns an error on arithmetic overflow or if the coupon does not
    /// apply to this cart.
    pub fn calculate(items: &[CartItem], policy: &PricingPolicy) -> Result<Self, CommerceError> {
        let line_items = items
            .iter()
            .map(LineItemPricing::for_item)
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = Money::try_sum(line_items.iter().map(|l| l.subtotal))
            .ok_or(CommerceError::Overflow)?;
        let savings = Money::try_sum(line_items.iter().map(|l| l.savings))
            .ok_or(CommerceError::Overflow)?;

        let discount = policy
            .discount
            .as_ref()
            .map(|d| d.apply(items, subtotal))
            .transpose()?;
        let discount_total = discount.as_ref().map_or(Money::zero(), |d| d.amount);

        let taxable_amount = subtotal
            .checked_sub(discount_total)
            .ok_or(CommerceError::Overflow)?;
        let gst_total = taxable_amount
            .apply_rate(policy.gst_rate_bps)
            .ok_or(CommerceError::Overflow)?;
        let grand_total = taxable_amount
            .checked_add(gst_total)
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            subtotal,
            savings,
            discount,
            discount_total,
            taxable_amount,
            gst_rate_bps: policy.gst_rate_bps,
            gst_total,
            grand_total,
            line_items,
        })
    }

    /// Check if a coupon was applied.
    pub fn has_discount(&self) -> bool {
        self.discount_total.is_positive()
    }

    /// MRP savings plus coupon.
    pub fn total_savings(&self) -> Money {
        self.savings + self.discount_total
    }

    /// GST rate as a percentage, e.g. `18.0`.
    pub fn gst_percentage(&self) -> f64 {
        f64::from(self.gst_rate_bps) / 100.0
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Catalogue id.
    pub id: CatalogId,
    /// Catalogue the id belongs to.
    pub item_type: ItemType,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: u32,
    /// Subtotal (unit_price * quantity).
    pub subtotal: Money,
    /// (original_price - unit_price) * quantity when the original is higher.
    pub savings: Money,
}

impl LineItemPricing {
    fn for_item(item: &CartItem) -> Result<Self, CommerceError> {
        let subtotal = item
            .price
            .checked_mul(item.quantity)
            .ok_or(CommerceError::Overflow)?;

        let savings = match item.original_price {
            Some(original) if original > item.price => original
                .checked_sub(item.price)
                .and_then(|per_unit| per_unit.checked_mul(item.quantity))
                .ok_or(CommerceError::Overflow)?,
            _ => Money::zero(),
        };

        Ok(Self {
            id: item.id.clone(),
            item_type: item.item_type,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: item.quantity,
            subtotal,
            savings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::DiscountCondition;

    fn items() -> Vec<CartItem> {
        vec![
            CartItem::product("p1", "Shampoo", Money::from_rupees(250))
                .with_quantity(2)
                .with_original_price(Money::from_rupees(300)),
            CartItem::space("v1", "Banquet hall", Money::from_rupees(1000)),
        ]
    }

    #[test]
    fn test_gst_on_subtotal() {
        let items = vec![CartItem::product("p1", "Shampoo", Money::from_rupees(250)).with_quantity(2)];
        let pricing = CartPricing::calculate(&items, &PricingPolicy::default()).unwrap();

        assert_eq!(pricing.subtotal, Money::from_rupees(500));
        assert_eq!(pricing.gst_total, Money::from_rupees(90));
        assert_eq!(pricing.grand_total, Money::from_rupees(590));
        assert!((pricing.gst_percentage() - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_savings_from_original_price() {
        let pricing = CartPricing::calculate(&items(), &PricingPolicy::default()).unwrap();
        assert_eq!(pricing.savings, Money::from_rupees(100));
        assert_eq!(pricing.line_items[1].savings, Money::zero());
    }

    #[test]
    fn test_discount_reduces_taxable_amount() {
        let policy = PricingPolicy::default()
            .with_discount(Discount::percentage("SAVE10", "10% off", 1000));
        let pricing = CartPricing::calculate(&items(), &policy).unwrap();

        assert_eq!(pricing.subtotal, Money::from_rupees(1500));
        assert_eq!(pricing.discount_total, Money::from_rupees(150));
        assert_eq!(pricing.taxable_amount, Money::from_rupees(1350));
        assert_eq!(pricing.gst_total, Money::from_rupees(243));
        assert_eq!(pricing.grand_total, Money::from_rupees(1593));
        assert_eq!(pricing.total_savings(), Money::from_rupees(250));
        assert!(pricing.has_discount());
    }

    #[test]
    fn test_inapplicable_discount_is_an_error() {
        let coupon = Discount::percentage("SALON", "Salon only", 1000)
            .with_condition(DiscountCondition::ItemTypeInCart(ItemType::Service));
        let policy = PricingPolicy::default().with_discount(coupon);
        assert!(CartPricing::calculate(&items(), &policy).is_err());
    }

    #[test]
    fn test_zero_gst_rate() {
        let pricing = CartPricing::calculate(&items(), &PricingPolicy::with_gst_rate(0)).unwrap();
        assert_eq!(pricing.gst_total, Money::zero());
        assert_eq!(pricing.grand_total, pricing.subtotal);
    }

    #[test]
    fn test_overflow_reported() {
        let items = vec![CartItem::product("p1", "Gold", Money::from_paise(i64::MAX)).with_quantity(2)];
        let result = CartPricing::calculate(&items, &PricingPolicy::default());
        assert!(matches!(result, Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let pricing = CartPricing::calculate(&[], &PricingPolicy::default()).unwrap();
        assert_eq!(pricing.grand_total, Money::zero());
        assert!(pricing.line_items.is_empty());
    }
}
