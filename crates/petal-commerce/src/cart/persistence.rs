//! Mirrors the cart into a durable slot.

use std::sync::Arc;

use petal_cache::SlotStore;

use crate::cart::CartState;
use crate::codec;

/// Slot key used when configuration doesn't name one.
pub const DEFAULT_SLOT_KEY: &str = "petal-cart";

/// Loads and saves [`CartState`] through a [`SlotStore`].
///
/// Both directions are best-effort: a missing or unreadable slot loads as an
/// empty cart, and a failed write is logged and dropped.
#[derive(Clone)]
pub struct CartPersistence {
    store: Arc<dyn SlotStore>,
    key: String,
}

impl CartPersistence {
    /// Create an adapter for `key` in `store`.
    pub fn new(store: Arc<dyn SlotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Slot key this adapter reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the slot, substituting an empty cart on any failure.
    pub fn load(&self) -> CartState {
        match self.store.get(&self.key) {
            Ok(Some(text)) => codec::decode(&text),
            Ok(None) => CartState::default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cart slot unreadable");
                CartState::default()
            }
        }
    }

    /// Overwrite the slot with `state`.
    ///
    /// Returns whether the write landed. Callers are free to ignore it.
    pub fn save(&self, state: &CartState) -> bool {
        let text = match codec::encode(state) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cart encode failed");
                return false;
            }
        };

        match self.store.set(&self.key, &text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cart write dropped");
                false
            }
        }
    }
}

impl std::fmt::Debug for CartPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
