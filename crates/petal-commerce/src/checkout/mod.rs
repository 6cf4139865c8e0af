//! Checkout module.
//!
//! Contains the shipping form and its validation, the order request sent
//! to the gateway, the checkout state machine, and relay handoff.

mod flow;
mod form;
mod order;
mod relay;

pub use flow::{
    Checkout, CheckoutOutcome, CheckoutPhase, Navigation, PendingSubmission, SubmitMode,
    FAILURE_NOTICE,
};
pub use form::{CheckoutForm, FormField, ShippingAddress, ValidationErrors, INVALID_EMAIL};
pub use order::{Order, OrderItem, OrderRequest};
pub use relay::{compose_summary, DeepLink, RecordingRelay, RelayChannel, DEFAULT_RELAY_ENDPOINT};
