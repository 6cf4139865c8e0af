//! Product catalog module.
//!
//! Products are owned by the gateway; this crate only reads them.

mod product;

pub use product::{clamp_selection, Product, ProductCategory, MAX_SELECTION};
