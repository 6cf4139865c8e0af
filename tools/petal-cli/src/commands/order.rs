//! Order confirmation.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, Utc};
use petal_commerce::ids::OrderId;
use serde::{Deserialize, Serialize};

use crate::context::Context;

/// Slot key the most recent receipt is kept under.
pub const RECEIPT_KEY: &str = "last-order";

/// What the shopper is shown after an order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub relayed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_link: Option<String>,
}

/// Show the most recent order confirmation.
pub async fn run(ctx: &Context) -> Result<()> {
    let receipt: Option<Receipt> = petal_cache::get_json(ctx.store.as_ref(), RECEIPT_KEY)
        .context("Failed to read order receipt")?;

    match receipt {
        Some(receipt) => print_receipt(&receipt, ctx),
        None => ctx.output.info("No orders placed yet."),
    }
    Ok(())
}

/// Print an order confirmation.
pub fn print_receipt(receipt: &Receipt, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(receipt);
        return;
    }

    ctx.output.success(&format!("Order #{} placed", receipt.order_id));
    ctx.output.kv("Order", &receipt.order_id.to_string());
    ctx.output.kv(
        "Placed",
        &receipt
            .placed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    );
    if receipt.relayed {
        ctx.output.kv("Relayed", "yes");
    }
    if let Some(link) = &receipt.relay_link {
        ctx.output.kv("Link", link);
    }
    ctx.output.info("Thank you for your order!");
}
