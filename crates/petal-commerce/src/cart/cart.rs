//! Cart state and line types.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One product plus a positive quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Product snapshot taken when the line was created.
    pub product: Product,
    /// Quantity; always at least 1 inside a store.
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity` for this line.
    pub fn line_total(&self) -> Money {
        Money::line_total(self.product.price, self.quantity)
    }
}

/// The ordered cart lines.
///
/// Insertion order is preserved for rendering. This is exactly what the
/// codec persists; presentation flags live on the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CartState {
    pub lines: Vec<CartLine>,
}

impl CartState {
    /// Sum of all line quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum over lines of `price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by product ID.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub(crate) fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }
}

/// Immutable view of the cart published after every change.
///
/// Aggregates are computed from `lines` when the snapshot is built, so a
/// snapshot can never disagree with itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub is_open: bool,
    pub item_count: u64,
    pub subtotal: Money,
}

impl CartSnapshot {
    pub(crate) fn capture(state: &CartState, is_open: bool) -> Self {
        Self {
            lines: state.lines.clone(),
            is_open,
            item_count: state.item_count(),
            subtotal: state.subtotal(),
        }
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
