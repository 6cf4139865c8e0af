//! Shopping cart module.
//!
//! Contains the cart lines, the owning store, and the persistence adapter
//! that mirrors the store into a durable slot.

mod cart;
mod persistence;
mod store;

pub use cart::{CartLine, CartSnapshot, CartState};
pub use persistence::{CartPersistence, DEFAULT_SLOT_KEY};
pub use store::CartStore;
