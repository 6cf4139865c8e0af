//! Relay handoff: forwarding a placed order to a messaging channel.
//!
//! The summary travels as a URL-encoded `text` parameter on a deep link.
//! Dispatch is one-way: nothing is read back and delivery is never
//! confirmed.

use std::sync::Mutex;

use crate::cart::CartLine;
use crate::checkout::CheckoutForm;
use crate::ids::OrderId;
use crate::money::Money;

/// Messaging endpoint used when configuration doesn't name one.
pub const DEFAULT_RELAY_ENDPOINT: &str = "https://wa.me/919898047431";

/// A link that opens the messaging channel with a prefilled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    url: String,
}

impl DeepLink {
    /// Build `<endpoint>?text=<url-encoded message>`.
    pub fn new(endpoint: &str, message: &str) -> Self {
        Self {
            url: format!("{}?text={}", endpoint, urlencoding::encode(message)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Decode the message back out of the link.
    pub fn message(&self) -> Option<String> {
        let (_, encoded) = self.url.split_once("?text=")?;
        urlencoding::decode(encoded).ok().map(|m| m.into_owned())
    }
}

impl std::fmt::Display for DeepLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

/// A one-way channel that deep links are handed to.
///
/// Implementations must not block on delivery and have no way to report
/// failure back to the checkout.
pub trait RelayChannel: Send + Sync {
    fn dispatch(&self, link: &DeepLink);
}

/// Channel that keeps every dispatched link, newest last.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    sent: Mutex<Vec<DeepLink>>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links dispatched so far.
    pub fn sent(&self) -> Vec<DeepLink> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl RelayChannel for RecordingRelay {
    fn dispatch(&self, link: &DeepLink) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(link.clone());
        }
    }
}

/// Compose the plain-text order summary sent through the relay.
pub fn compose_summary(order_id: OrderId, lines: &[CartLine], form: &CheckoutForm) -> String {
    let items: Vec<String> = lines
        .iter()
        .map(|line| {
            format!(
                "\u{2022} {} x{} \u{2014} {}",
                line.product.name,
                line.quantity,
                line.line_total()
            )
        })
        .collect();
    let total: Money = lines.iter().map(CartLine::line_total).sum();

    format!(
        "Hello! I'd like to place an order:\n\n\
         *Order #{order_id}*\n\n\
         *Items:*\n{items}\n\n\
         *Total: {total}*\n\n\
         *Shipping to:*\n{name}\n{address}\n\n\
         Email: {email}",
        items = items.join("\n"),
        name = form.name,
        address = form.shipping_address().one_line(),
        email = form.email,
    )
}
