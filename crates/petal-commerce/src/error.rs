//! Commerce error types.

use thiserror::Error;

use crate::checkout::ValidationErrors;
use crate::ids::ProductId;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found at the gateway.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The gateway refused the order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// The gateway could not be reached or answered garbage.
    #[error("Gateway unavailable: {0}")]
    Gateway(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A submission is already awaiting the gateway.
    #[error("An order submission is already in progress")]
    SubmissionInProgress,

    /// Shipping or contact fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Persisted cart text could not be decoded.
    #[error("Cart codec error: {0}")]
    Codec(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Whether this came from the remote side rather than local state.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            CommerceError::ProductNotFound(_)
                | CommerceError::OrderRejected(_)
                | CommerceError::Gateway(_)
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
