//! Checkout command.

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use dialoguer::{Confirm, Input};
use petal_commerce::checkout::{
    CheckoutOutcome, DeepLink, FormField, Navigation, RelayChannel, SubmitMode,
};
use petal_commerce::gateway::StoreGateway;
use petal_commerce::CommerceError;

use super::order::{Receipt, RECEIPT_KEY};
use super::CheckoutArgs;
use crate::commands::cart::print_cart;
use crate::context::Context;
use crate::output::{phase_badge, Output};

/// Relay channel that hands the link to the shopper's terminal.
struct TerminalRelay {
    output: Output,
}

impl RelayChannel for TerminalRelay {
    fn dispatch(&self, link: &DeepLink) {
        self.output.info("Open this link to send your order summary:");
        self.output.info(link.as_str());
    }
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart();
    let mut checkout = ctx.checkout();

    if checkout.entry_route(&cart) == Some(Navigation::Catalog) {
        ctx.output.warn("Your cart is empty. Browse products with `petal catalog`.");
        return Ok(());
    }

    for (field, value) in args.fields() {
        if let Some(value) = value {
            checkout.set_field(field, value.as_str());
        }
    }

    if !args.no_input && !ctx.output.is_json() {
        for field in FormField::ALL {
            if checkout.form().get(field).trim().is_empty() {
                let value: String = Input::new()
                    .with_prompt(prompt_label(field))
                    .allow_empty(true)
                    .interact_text()?;
                checkout.set_field(field, value);
            }
        }
    }

    print_cart(&cart, ctx);

    let mode = if args.relay {
        SubmitMode::Relay
    } else {
        SubmitMode::Direct
    };
    let pending = match checkout.begin_submission(&cart, mode) {
        Ok(pending) => pending,
        Err(CommerceError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                ctx.output.warn(&format!("{}: {}", prompt_label(field), message));
            }
            bail!("Please fix {} field(s) and try again", errors.len());
        }
        Err(e) => return Err(e.into()),
    };

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;

        if !confirmed {
            checkout.cancel_submission(pending);
            ctx.output.warn("Order not placed");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let result = ctx.gateway.create_order(pending.request()).await;
    spinner.finish_and_clear();

    let relay = TerminalRelay {
        output: ctx.output.clone(),
    };
    let outcome = match checkout.complete_submission(pending, result, &mut cart, &relay) {
        Ok(outcome) => outcome,
        Err(e) => {
            ctx.output.kv("Checkout", phase_badge(checkout.phase().as_str()));
            let notice = checkout.notice().unwrap_or("Failed to place order");
            return Err(e).context(notice);
        }
    };

    let receipt = save_receipt(&outcome, ctx)?;
    match outcome.navigation {
        Navigation::OrderConfirmation(_) => super::order::print_receipt(&receipt, ctx),
        Navigation::Catalog => ctx.output.info("Browse products with `petal catalog`."),
    }
    Ok(())
}

fn save_receipt(outcome: &CheckoutOutcome, ctx: &Context) -> Result<Receipt> {
    let receipt = Receipt {
        order_id: outcome.order_id,
        placed_at: Utc::now(),
        relayed: outcome.mode == SubmitMode::Relay,
        relay_link: outcome.relay_link.as_ref().map(|l| l.as_str().to_string()),
    };
    petal_cache::set_json(ctx.store.as_ref(), RECEIPT_KEY, &receipt)
        .context("Failed to save order receipt")?;
    tracing::debug!(order_id = %receipt.order_id, "receipt saved");
    Ok(receipt)
}

fn prompt_label(field: FormField) -> &'static str {
    match field {
        FormField::Name => "Full name",
        FormField::Email => "Email",
        FormField::Street => "Street address",
        FormField::City => "City",
        FormField::State => "State",
        FormField::PostalCode => "Postal code",
    }
}
