//! Order request and order types.

use crate::cart::CartLine;
use crate::checkout::ShippingAddress;
use crate::codec::decimal;
use crate::ids::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// One line of an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(with = "decimal")]
    pub quantity: u64,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            quantity: u64::from(line.quantity),
        }
    }
}

/// What the orchestrator sends to `create_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub email: String,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
}

/// An order as stored by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub email: String,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
    #[serde(with = "decimal")]
    pub total_price: u64,
}

impl Order {
    /// Total number of units across all items.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
