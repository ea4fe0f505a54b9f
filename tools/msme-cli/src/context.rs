//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use msme_cache::Cache;
use msme_commerce::cart::{find_discount, CartStore, PricingPolicy};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Path the config was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory the cart is stored in.
    ///
    /// A relative `storage.dir` resolves against the config file's directory
    /// (or the working directory when there is no config file).
    pub fn storage_dir(&self) -> PathBuf {
        match &self.config.storage.dir {
            Some(dir) => {
                let base = self
                    .config_path
                    .as_deref()
                    .and_then(Path::parent)
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(self.cwd.as_path());
                resolve_path(base, dir)
            }
            None => dirs_path().join("msme"),
        }
    }

    /// Open the cart store.
    pub fn open_store(&self) -> Result<CartStore> {
        let dir = self.storage_dir();
        let cache = Cache::open(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        Ok(CartStore::with_key(cache, self.config.storage.cart_key.clone()))
    }

    /// Build the pricing policy, applying a coupon code if one is given.
    pub fn pricing_policy(&self, coupon: Option<&str>) -> Result<PricingPolicy> {
        let mut policy = PricingPolicy::with_gst_rate(self.config.pricing.gst_rate_bps);
        if let Some(code) = coupon {
            let discount = find_discount(&self.config.coupons, code)?;
            policy = policy.with_discount(discount.clone());
        }
        Ok(policy)
    }
}

fn resolve_path(base: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(config: CliConfig, config_path: Option<PathBuf>, cwd: &Path) -> Context {
        Context {
            config,
            config_path,
            output: Output::new(false),
            cwd: cwd.to_path_buf(),
        }
    }

    #[test]
    fn test_relative_storage_dir_follows_config_file() {
        let mut config = CliConfig::default();
        config.storage.dir = Some(".msme".to_string());
        let ctx = context(config, Some(PathBuf::from("/srv/shop/msme.toml")), Path::new("/tmp"));

        assert_eq!(ctx.storage_dir(), PathBuf::from("/srv/shop/.msme"));
    }

    #[test]
    fn test_relative_storage_dir_without_config_file() {
        let mut config = CliConfig::default();
        config.storage.dir = Some("carts".to_string());
        let ctx = context(config, None, Path::new("/work"));

        assert_eq!(ctx.storage_dir(), PathBuf::from("/work/carts"));
    }

    #[test]
    fn test_open_store_and_coupon_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config: CliConfig = toml::from_str(&crate::config::generate_default_config()).unwrap();
        config.storage.dir = Some(dir.path().to_string_lossy().to_string());
        let ctx = context(config, None, dir.path());

        let store = ctx.open_store().unwrap();
        assert!(store.is_empty());

        let policy = ctx.pricing_policy(Some("welcome50")).unwrap();
        assert_eq!(policy.gst_rate_bps, 1800);
        assert!(policy.discount.is_some());
        assert!(ctx.pricing_policy(Some("BOGUS")).is_err());
    }
}
