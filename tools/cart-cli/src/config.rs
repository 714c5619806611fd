//! CLI configuration.

use std::path::Path;

use std::time::Duration;

use anyhow::{Context, Result};
use cart_core::cart::DEFAULT_CART_KEY;
use cart_data::{BackoffStrategy, RetryPolicy};
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cart.toml", ".cart.toml", "cart.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storefront API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CartConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Storefront API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the storefront API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt timeout for stock lookups.
    #[serde(default = "default_inventory_timeout_ms")]
    pub inventory_timeout_ms: u64,

    /// Per-attempt timeout for catalog lookups.
    #[serde(default = "default_catalog_timeout_ms")]
    pub catalog_timeout_ms: u64,

    /// Retries after a failed attempt (5xx, timeout, connection error).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between retries. Unset means exponential backoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_ms: Option<u64>,
}

impl ApiConfig {
    /// Retry policy shared by every storefront dependency.
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(self.max_retries);
        match self.backoff_ms {
            Some(ms) => policy.with_backoff(BackoffStrategy::Fixed(Duration::from_millis(ms))),
            None => policy,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_inventory_timeout_ms() -> u64 {
    2_000
}

fn default_catalog_timeout_ms() -> u64 {
    3_000
}

fn default_max_retries() -> u32 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            inventory_timeout_ms: default_inventory_timeout_ms(),
            catalog_timeout_ms: default_catalog_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_ms: None,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted cart, relative to the working directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Key the cart is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_data_dir() -> String {
    ".cart".to_string()
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Logging settings. `RUST_LOG` takes precedence over `log_level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Generate a default cart.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront cart configuration

[api]
base_url = "{base_url}"
inventory_timeout_ms = {inventory}
catalog_timeout_ms = {catalog}
max_retries = {retries}
# Fixed delay between retries; exponential backoff when unset.
# backoff_ms = 100

[storage]
data_dir = "{data_dir}"
cart_key = "{cart_key}"

[logging]
# Overridden by RUST_LOG when set.
log_level = "{log_level}"
# compact | json
log_format = "compact"
"#,
        base_url = default_base_url(),
        inventory = default_inventory_timeout_ms(),
        catalog = default_catalog_timeout_ms(),
        retries = default_max_retries(),
        data_dir = default_data_dir(),
        cart_key = DEFAULT_CART_KEY,
        log_level = default_log_level(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: CartConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CartConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CartConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://shop.example.com"

            [logging]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://shop.example.com");
        assert_eq!(config.api.inventory_timeout_ms, 2_000);
        assert_eq!(config.storage.cart_key, "@RocketShoes:cart");
        assert_eq!(config.logging.log_format, LogFormat::Json);
    }

    #[test]
    fn test_retry_backoff_from_config() {
        let mut api = ApiConfig::default();
        assert_eq!(api.retry_policy().backoff, BackoffStrategy::default());

        api.backoff_ms = Some(100);
        api.max_retries = 3;
        let policy = api.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(
            policy.backoff,
            BackoffStrategy::Fixed(Duration::from_millis(100))
        );
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let mut config = CartConfig::default();
        config.storage.data_dir = "/var/lib/cart".to_string();
        config.save(&path).unwrap();

        assert_eq!(CartConfig::load(&path).unwrap(), config);
    }
}
