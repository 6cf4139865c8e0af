//! Cart and order orchestration core for the Petal storefront.
//!
//! - **Catalog**: products and categories as the gateway reports them
//! - **Cart**: the owning cart store, its persisted text form, snapshots
//! - **Checkout**: form validation, the submission state machine, relay handoff
//! - **Gateway**: the remote catalog/order contract, an in-memory
//!   implementation, and a caching wrapper
//!
//! # Example
//!
//! ```rust,ignore
//! use petal_commerce::prelude::*;
//!
//! let gateway = MemoryGateway::seeded();
//! let mut cart = CartStore::in_memory();
//!
//! let product = gateway.get_product(ProductId::new(1)).await?;
//! cart.add_item(product, 2);
//! println!("Subtotal: {}", cart.subtotal());
//!
//! let mut checkout = Checkout::new();
//! checkout.set_field(FormField::Name, "Asha Rao");
//! // ...
//! let outcome = checkout
//!     .submit(&mut cart, &gateway, SubmitMode::Direct, &RecordingRelay::new())
//!     .await?;
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod gateway;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{RelayConfig, StorageConfig, StorefrontConfig};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{clamp_selection, Product, ProductCategory};

    // Cart
    pub use crate::cart::{CartLine, CartPersistence, CartSnapshot, CartState, CartStore};

    // Checkout
    pub use crate::checkout::{
        Checkout, CheckoutForm, CheckoutOutcome, CheckoutPhase, DeepLink, FormField,
        Navigation, OrderRequest, RecordingRelay, RelayChannel, SubmitMode, ValidationErrors,
    };

    // Gateway
    pub use crate::gateway::{
        lookup_product, CachedGateway, MemoryGateway, ProductLookup, StoreGateway,
    };
}
