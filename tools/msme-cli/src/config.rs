//! CLI configuration.

use anyhow::{Context, Result};
use msme_commerce::cart::{Discount, DEFAULT_CART_KEY, DEFAULT_GST_RATE_BPS};
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["msme.toml", ".msme.toml", "msme.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tax settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Coupons accepted at checkout.
    #[serde(default)]
    pub coupons: Vec<Discount>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Check the config, returning (errors, warnings).
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.storage.cart_key.trim().is_empty() {
            errors.push("storage.cart_key must not be empty".to_string());
        }

        if self.pricing.gst_rate_bps > 10_000 {
            errors.push(format!(
                "pricing.gst_rate_bps is {} (over 100%)",
                self.pricing.gst_rate_bps
            ));
        } else if self.pricing.gst_rate_bps != DEFAULT_GST_RATE_BPS {
            warnings.push(format!(
                "pricing.gst_rate_bps is {}, not the standard {}",
                self.pricing.gst_rate_bps, DEFAULT_GST_RATE_BPS
            ));
        }

        for (i, coupon) in self.coupons.iter().enumerate() {
            if coupon.code.trim().is_empty() {
                errors.push(format!("coupons[{}].code must not be empty", i));
            }
            let duplicates = self
                .coupons
                .iter()
                .skip(i + 1)
                .filter(|other| other.matches_code(&coupon.code))
                .count();
            if duplicates > 0 {
                errors.push(format!("coupon code '{}' is defined more than once", coupon.code));
            }
            if !coupon.active {
                warnings.push(format!("coupon '{}' is inactive", coupon.code));
            }
        }

        (errors, warnings)
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the cart (default: ~/.local/share/msme).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Key the cart is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            cart_key: default_cart_key(),
        }
    }
}

/// Pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// GST rate in basis points (1800 = 18%).
    #[serde(default = "default_gst_rate_bps")]
    pub gst_rate_bps: u32,
}

fn default_gst_rate_bps() -> u32 {
    DEFAULT_GST_RATE_BPS
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            gst_rate_bps: default_gst_rate_bps(),
        }
    }
}

/// Generate a default msme.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# MSME portal cart configuration

[storage]
# dir = ".msme"
cart_key = "{cart_key}"

[pricing]
# 1800 basis points = 18% GST
gst_rate_bps = {gst}

[[coupons]]
code = "WELCOME50"
name = "Flat 50 off your first order"
value = {{ fixed = 50 }}
conditions = [{{ minimum_purchase = 499 }}]

[[coupons]]
code = "SALON10"
name = "10% off salon services"
value = {{ percentage = 1000 }}
conditions = [{{ item_type_in_cart = "service" }}]
"#,
        cart_key = DEFAULT_CART_KEY,
        gst = DEFAULT_GST_RATE_BPS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use msme_commerce::cart::{DiscountCondition, DiscountValue};
    use msme_commerce::Money;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.storage.cart_key, DEFAULT_CART_KEY);
        assert_eq!(config.pricing.gst_rate_bps, 1800);
        assert_eq!(config.coupons.len(), 2);
        assert_eq!(config.coupons[0].value, DiscountValue::Fixed(Money::from_rupees(50)));
        assert_eq!(
            config.coupons[1].conditions,
            vec![DiscountCondition::ItemTypeInCart(msme_commerce::cart::ItemType::Service)]
        );

        let (errors, warnings) = config.validate();
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage.cart_key, DEFAULT_CART_KEY);
        assert!(config.storage.dir.is_none());
        assert_eq!(config.pricing.gst_rate_bps, DEFAULT_GST_RATE_BPS);
    }

    #[test]
    fn test_validate_flags_problems() {
        let mut config = CliConfig::default();
        config.pricing.gst_rate_bps = 12_000;
        config.coupons = vec![
            Discount::percentage("DUP", "One", 100),
            Discount::percentage("dup", "Two", 200),
        ];

        let (errors, _) = config.validate();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msme.json");
        std::fs::write(&path, r#"{"storage": {"dir": "carts"}}"#).unwrap();

        let loaded = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.storage.dir.as_deref(), Some("carts"));
    }
}
