//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use cart_cache::FileStore;
use cart_core::notice::NoticeLog;
use cart_core::CartStore;
use cart_data::{
    DependencyTag, FetchClient, FetchPolicy, StorefrontClient, TimeoutConfig,
};
use tracing::debug;

use crate::config::{CartConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CartConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

/// An opened cart store and the log its notices are collected in.
pub struct Session {
    pub store: CartStore,
    pub notices: NoticeLog,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CartConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CartConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CartConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CartConfig::load(&config_path) {
                        return Some((config_path, config));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory the cart is persisted in.
    pub fn data_dir(&self) -> PathBuf {
        resolve(&self.cwd, &self.config.storage.data_dir)
    }

    /// Storefront client with the configured timeouts and retries.
    pub fn storefront(&self) -> Result<StorefrontClient> {
        let api = &self.config.api;
        let retry = api.retry_policy();

        let fetch = FetchClient::new(api.base_url.clone())?
            .with_policy(
                DependencyTag::Inventory,
                FetchPolicy::new(
                    TimeoutConfig::from_millis(api.inventory_timeout_ms),
                    retry.clone(),
                ),
            )
            .with_policy(
                DependencyTag::Catalog,
                FetchPolicy::new(
                    TimeoutConfig::from_millis(api.catalog_timeout_ms),
                    retry.clone(),
                ),
            )
            .with_policy(
                DependencyTag::Listing,
                FetchPolicy::new(
                    TimeoutConfig::from_total(DependencyTag::Listing.default_timeout()),
                    retry,
                ),
            );

        Ok(StorefrontClient::from_fetch(fetch))
    }

    /// Open the persisted cart.
    pub fn open_session(&self) -> Result<Session> {
        let data_dir = self.data_dir();
        let persistence = FileStore::open(data_dir.clone())
            .with_context(|| format!("Failed to open cart storage: {}", data_dir.display()))?;
        let storefront = Arc::new(self.storefront()?);
        let notices = NoticeLog::new();

        debug!(data_dir = %data_dir.display(), key = %self.config.storage.cart_key, "opening cart");
        let store = CartStore::builder(storefront.clone(), storefront, Arc::new(persistence))
            .key(self.config.storage.cart_key.clone())
            .notifier(notices.clone())
            .open()
            .context("Failed to load the persisted cart")?;

        Ok(Session { store, notices })
    }
}

/// Resolve a path relative to the working directory.
fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
