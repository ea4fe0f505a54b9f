//! Money type for representing rupee amounts.
//!
//! Amounts are held as integer paise so that totals are exact. On the wire a
//! `Money` is a plain JSON number of rupees (`250`, `99.5`), which is the
//! shape the persisted cart uses for `price` and `originalPrice`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Paise in one rupee.
pub const PAISE_PER_RUPEE: i64 = 100;

/// Denominator for rates expressed in basis points (1% = 100 bps).
pub const BASIS_POINTS: i64 = 10_000;

const RUPEE_SYMBOL: &str = "\u{20b9}";

/// A monetary value in Indian rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    paise: i64,
}

impl Money {
    /// Create a Money value from paise.
    pub const fn from_paise(paise: i64) -> Self {
        Self { paise }
    }

    /// Create a Money value from whole rupees.
    pub fn from_rupees(rupees: i64) -> Self {
        Self::from_paise(rupees.saturating_mul(PAISE_PER_RUPEE))
    }

    /// Create a Money value from a decimal rupee amount, rounding to the paisa.
    ///
    /// ```
    /// use msme_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.paise(), 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::from_paise((amount * PAISE_PER_RUPEE as f64).round() as i64)
    }

    /// Zero rupees.
    pub const fn zero() -> Self {
        Self::from_paise(0)
    }

    /// Amount in paise.
    pub fn paise(&self) -> i64 {
        self.paise
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.paise == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.paise > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.paise < 0
    }

    /// Convert to a decimal rupee value.
    pub fn to_decimal(&self) -> f64 {
        self.paise as f64 / PAISE_PER_RUPEE as f64
    }

    /// Format with the rupee sign and Indian digit grouping, e.g. `₹1,23,456.50`.
    pub fn display(&self) -> String {
        format!("{}{}", RUPEE_SYMBOL, self.display_amount())
    }

    /// Format without the symbol, e.g. `1,23,456.50`.
    pub fn display_amount(&self) -> String {
        let sign = if self.paise < 0 { "-" } else { "" };
        let abs = self.paise.unsigned_abs();
        let rupees = abs / PAISE_PER_RUPEE as u64;
        let paise = abs % PAISE_PER_RUPEE as u64;
        format!("{}{}.{:02}", sign, group_indian(rupees), paise)
    }

    /// Add, returning `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.paise.checked_add(other.paise).map(Money::from_paise)
    }

    /// Subtract, returning `None` on overflow.
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.paise.checked_sub(other.paise).map(Money::from_paise)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, factor: u32) -> Option<Money> {
        self.paise.checked_mul(i64::from(factor)).map(Money::from_paise)
    }

    /// Multiply by a quantity, clamping at the numeric bounds.
    pub fn saturating_mul(&self, factor: u32) -> Money {
        Money::from_paise(self.paise.saturating_mul(i64::from(factor)))
    }

    /// Apply a rate in basis points, rounding half away from zero.
    ///
    /// ```
    /// use msme_commerce::money::Money;
    /// // 18% of ₹500
    /// assert_eq!(Money::from_rupees(500).apply_rate(1800), Some(Money::from_rupees(90)));
    /// ```
    pub fn apply_rate(&self, basis_points: u32) -> Option<Money> {
        let scaled = i128::from(self.paise) * i128::from(basis_points);
        let half = i128::from(BASIS_POINTS) / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / i128::from(BASIS_POINTS)
        } else {
            (scaled - half) / i128::from(BASIS_POINTS)
        };
        i64::try_from(rounded).ok().map(Money::from_paise)
    }

    /// Sum an iterator of Money values, returning `None` on overflow.
    pub fn try_sum(iter: impl IntoIterator<Item = Money>) -> Option<Money> {
        iter.into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }
}

/// Insert separators the Indian way: last three digits, then pairs.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_paise(self.paise.saturating_add(other.paise))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_paise(self.paise.saturating_sub(other.paise))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, factor: u32) -> Money {
        self.saturating_mul(factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.paise % PAISE_PER_RUPEE == 0 {
            serializer.serialize_i64(self.paise / PAISE_PER_RUPEE)
        } else {
            serializer.serialize_f64(self.to_decimal())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rupees = f64::deserialize(deserializer)?;
        if !rupees.is_finite() {
            return Err(serde::de::Error::custom("amount must be a finite number"));
        }
        Ok(Money::from_decimal(rupees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_rupees() {
        let m = Money::from_rupees(250);
        assert_eq!(m.paise(), 25_000);
    }

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).paise(), 4999);
        assert_eq!(Money::from_decimal(0.1 + 0.2).paise(), 30);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_paise(4999).display(), "\u{20b9}49.99");
        assert_eq!(Money::from_rupees(1_23_456).display(), "\u{20b9}1,23,456.00");
        assert_eq!(Money::from_rupees(12_34_56_789).display_amount(), "12,34,56,789.00");
        assert_eq!(Money::from_paise(-150).display_amount(), "-1.50");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(3);
        assert_eq!((a + b).paise(), 1300);
        assert_eq!((a - b).paise(), 700);
        assert_eq!((a * 4).paise(), 4000);
        assert_eq!(Money::from_paise(i64::MAX).checked_add(a), None);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // 18% of ₹0.25 = 4.5 paise
        assert_eq!(Money::from_paise(25).apply_rate(1800), Some(Money::from_paise(5)));
        // 18% of ₹0.24 = 4.32 paise
        assert_eq!(Money::from_paise(24).apply_rate(1800), Some(Money::from_paise(4)));
    }

    #[test]
    fn test_try_sum() {
        let total = Money::try_sum([Money::from_rupees(1), Money::from_rupees(2)]);
        assert_eq!(total, Some(Money::from_rupees(3)));
        assert_eq!(Money::try_sum([Money::from_paise(i64::MAX), Money::from_paise(1)]), None);
    }

    #[test]
    fn test_serializes_as_rupee_number() {
        assert_eq!(serde_json::to_string(&Money::from_rupees(250)).unwrap(), "250");
        assert_eq!(serde_json::to_string(&Money::from_paise(9950)).unwrap(), "99.5");

        let whole: Money = serde_json::from_str("250").unwrap();
        let fractional: Money = serde_json::from_str("99.99").unwrap();
        assert_eq!(whole, Money::from_rupees(250));
        assert_eq!(fractional.paise(), 9999);
    }

    #[test]
    fn test_rejects_non_numeric_amount() {
        assert!(serde_json::from_str::<Money>(r#""250""#).is_err());
    }
}
