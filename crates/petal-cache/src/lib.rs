//! Durable key-value slot storage for the Petal storefront.
//!
//! A slot is a named piece of text that is overwritten wholesale on every
//! write. The cart persistence adapter keeps the encoded cart in one slot.
//!
//! # Example
//!
//! ```rust,ignore
//! use petal_cache::{FileStore, SlotStore};
//!
//! let store = FileStore::open(".petal")?;
//! store.set("petal-cart", "[]")?;
//! let text = store.get("petal-cart")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::{get_json, set_json, FileStore, MemoryStore, SlotStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheError, FileStore, MemoryStore, SlotStore};
}
