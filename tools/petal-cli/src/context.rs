//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use petal_cache::{FileStore, SlotStore};
use petal_commerce::cart::{CartPersistence, CartStore};
use petal_commerce::checkout::Checkout;
use petal_commerce::config::StorefrontConfig;
use petal_commerce::gateway::{CachedGateway, GatewayState, MemoryGateway, StoreGateway};

use crate::config::{self, CONFIG_NAMES};
use crate::output::Output;

/// Slot holding the catalog, orders and id counters between runs.
pub const GATEWAY_KEY: &str = "gateway";

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Slot storage for the cart and receipts.
    pub store: Arc<FileStore>,
    /// Catalog and order service.
    pub gateway: CachedGateway<MemoryGateway>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, Path::new(path));
                (config::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (StorefrontConfig::default(), None),
            },
        };

        let base = config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(cwd.as_path())
            .to_path_buf();
        let data_dir = resolve(&base, Path::new(&config.storage.data_dir));
        let store = FileStore::open(&data_dir)
            .with_context(|| format!("Failed to open data directory: {}", data_dir.display()))?;
        output.debug(&format!("Slot storage at {}", data_dir.display()));
        let gateway = load_gateway(&store)?;

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            store: Arc::new(store),
            gateway: CachedGateway::new(gateway),
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(StorefrontConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let path = current.join(name);
                if path.exists() {
                    if let Ok(config) = config::load(&path) {
                        return Some((config, path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Populate the catalog. Safe to call more than once.
    pub async fn seed_catalog(&self) -> Result<()> {
        self.gateway
            .seed_products()
            .await
            .context("Failed to seed the catalog")
    }

    /// Write the catalog, orders and id counters back to their slot.
    pub fn save_gateway(&self) -> Result<()> {
        save_gateway(self.store.as_ref(), self.gateway.inner())
    }

    /// Restore the cart from its slot.
    pub fn open_cart(&self) -> CartStore {
        CartStore::open(CartPersistence::new(
            self.store.clone(),
            self.config.storage.slot_key.clone(),
        ))
    }

    /// A fresh checkout wired to the configured relay endpoint.
    pub fn checkout(&self) -> Checkout {
        Checkout::new().with_relay_endpoint(self.config.relay.endpoint.clone())
    }
}

/// Restore the gateway saved by an earlier run, or start empty.
fn load_gateway(store: &dyn SlotStore) -> Result<MemoryGateway> {
    let state = petal_cache::get_json::<GatewayState>(store, GATEWAY_KEY)
        .context("Failed to read saved orders and catalog")?;
    Ok(state.map(MemoryGateway::from_state).unwrap_or_default())
}

fn save_gateway(store: &dyn SlotStore, gateway: &MemoryGateway) -> Result<()> {
    let state = gateway.state();
    petal_cache::set_json(store, GATEWAY_KEY, &state)
        .context("Failed to save orders and catalog")?;
    tracing::debug!(orders = state.orders.len(), "gateway state saved");
    Ok(())
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
