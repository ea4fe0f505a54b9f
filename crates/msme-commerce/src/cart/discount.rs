//! Coupon codes.

use crate::cart::{CartItem, ItemType};
use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Value of the discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValue {
    /// Percentage off, in basis points (1000 = 10%).
    Percentage(u32),
    /// Fixed amount off.
    Fixed(Money),
}

impl DiscountValue {
    /// Calculate the discount amount for a given subtotal.
    ///
    /// Never exceeds the subtotal and never goes negative.
    pub fn calculate(&self, subtotal: Money) -> Option<Money> {
        let amount = match self {
            DiscountValue::Percentage(bps) => subtotal.apply_rate(*bps)?,
            DiscountValue::Fixed(amount) => *amount,
        };
        Some(amount.min(subtotal).max(Money::zero()))
    }
}

/// Condition for a discount to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountCondition {
    /// Minimum cart subtotal.
    MinimumPurchase(Money),
    /// Minimum total quantity.
    MinimumQuantity(u64),
    /// At least one row of this type must be in the cart.
    ItemTypeInCart(ItemType),
}

impl DiscountCondition {
    /// Check the condition, returning a human-readable reason when it fails.
    fn check(&self, items: &[CartItem], subtotal: Money) -> Result<(), String> {
        match self {
            DiscountCondition::MinimumPurchase(min) if subtotal < *min => {
                Err(format!("requires a minimum purchase of {}", min))
            }
            DiscountCondition::MinimumQuantity(min) => {
                let count: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
                if count < *min {
                    Err(format!("requires at least {} items", min))
                } else {
                    Ok(())
                }
            }
            DiscountCondition::ItemTypeInCart(item_type)
                if !items.iter().any(|i| i.item_type == *item_type) =>
            {
                Err(format!("requires a {} in the cart", item_type))
            }
            _ => Ok(()),
        }
    }
}

/// A coupon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    /// Coupon code (e.g., "FESTIVE10"). Matched case-insensitively.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value of the discount.
    pub value: DiscountValue,
    /// Conditions that must all be met.
    #[serde(default)]
    pub conditions: Vec<DiscountCondition>,
    /// Whether the coupon can be redeemed at all.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Start of validity (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
    /// End of validity (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<i64>,
}

fn default_active() -> bool {
    true
}

impl Discount {
    /// Create a percentage coupon; `basis_points` of 1000 is 10% off.
    pub fn percentage(code: impl Into<String>, name: impl Into<String>, basis_points: u32) -> Self {
        Self::new(code, name, DiscountValue::Percentage(basis_points))
    }

    /// Create a fixed amount coupon.
    pub fn fixed_amount(code: impl Into<String>, name: impl Into<String>, amount: Money) -> Self {
        Self::new(code, name, DiscountValue::Fixed(amount))
    }

    fn new(code: impl Into<String>, name: impl Into<String>, value: DiscountValue) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            value,
            conditions: Vec::new(),
            active: true,
            starts_at: None,
            ends_at: None,
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: DiscountCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Restrict validity to a time window.
    pub fn with_window(mut self, starts_at: Option<i64>, ends_at: Option<i64>) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Whether `code` names this coupon.
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }

    /// Check if the discount is active at the given Unix time.
    pub fn is_valid_at(&self, now: i64) -> bool {
        if !self.active {
            return false;
        }
        if self.starts_at.is_some_and(|starts| now < starts) {
            return false;
        }
        if self.ends_at.is_some_and(|ends| now > ends) {
            return false;
        }
        true
    }

    /// Check if the discount is active now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(current_timestamp())
    }

    /// Validate against a cart and compute the amount off.
    pub fn apply(&self, items: &[CartItem], subtotal: Money) -> Result<AppliedDiscount, CommerceError> {
        if !self.is_valid() {
            return Err(CommerceError::DiscountExpired(self.code.clone()));
        }

        for condition in &self.conditions {
            condition
                .check(items, subtotal)
                .map_err(|reason| CommerceError::DiscountConditionNotMet {
                    code: self.code.clone(),
                    reason,
                })?;
        }

        let amount = self
            .value
            .calculate(subtotal)
            .ok_or(CommerceError::Overflow)?;

        Ok(AppliedDiscount {
            code: self.code.clone(),
            name: self.name.clone(),
            amount,
        })
    }
}

/// Find a coupon by code.
pub fn find_discount<'a>(discounts: &'a [Discount], code: &str) -> Result<&'a Discount, CommerceError> {
    discounts
        .iter()
        .find(|d| d.matches_code(code))
        .ok_or_else(|| CommerceError::InvalidDiscountCode(code.to_string()))
}

/// A discount that has been applied to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    /// Coupon code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Amount taken off the subtotal.
    pub amount: Money,
}

fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
