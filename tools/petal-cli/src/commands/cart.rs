//! Cart commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use petal_commerce::cart::CartStore;
use petal_commerce::catalog::clamp_selection;
use petal_commerce::gateway::{lookup_product, ProductLookup};

use super::{AddArgs, ClearArgs, RemoveArgs, SetArgs};
use crate::context::Context;
use crate::output::Cell;

const CART_WIDTHS: [usize; 5] = [6, 24, 5, 12, 14];

/// Show the cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart();
    print_cart(&cart, ctx);
    Ok(())
}

/// Add a product to the cart.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let product = match lookup_product(&ctx.gateway, args.id).await? {
        ProductLookup::Found(product) => product,
        ProductLookup::NotFound(id) => bail!("Product not found: {}", id),
    };

    let Some(quantity) = clamp_selection(args.quantity, product.stock_quantity) else {
        bail!("{} is out of stock", product.name);
    };
    if i64::from(quantity) != args.quantity {
        ctx.output.warn(&format!(
            "Requested {} but only {} can be selected; adding {}",
            args.quantity, quantity, quantity
        ));
    }

    let mut cart = ctx.open_cart();
    let name = product.name.clone();
    cart.add_item(product, quantity);
    ctx.output.success(&format!("Added {} x{} to cart", name, quantity));
    print_cart(&cart, ctx);
    Ok(())
}

/// Remove a line from the cart.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart();
    let Some(line) = cart.line(args.id) else {
        ctx.output.warn(&format!("Product {} is not in the cart", args.id));
        return Ok(());
    };
    let name = line.product.name.clone();

    cart.remove_item(args.id);
    ctx.output.success(&format!("Removed {}", name));
    print_cart(&cart, ctx);
    Ok(())
}

/// Set a line's quantity.
pub async fn set(args: SetArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart();
    if cart.line(args.id).is_none() {
        ctx.output.warn(&format!("Product {} is not in the cart", args.id));
        return Ok(());
    }

    cart.update_quantity(args.id, args.quantity);
    match cart.line(args.id) {
        Some(line) => ctx
            .output
            .success(&format!("{} quantity set to {}", line.product.name, line.quantity)),
        None => ctx.output.success(&format!("Removed product {}", args.id)),
    }
    print_cart(&cart, ctx);
    Ok(())
}

/// Empty the cart.
pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart();
    if cart.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from the cart?", cart.item_count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cancelled");
            return Ok(());
        }
    }

    cart.clear_cart();
    ctx.output.success("Cart cleared");
    Ok(())
}

/// Print the cart lines and totals.
pub fn print_cart(cart: &CartStore, ctx: &Context) {
    let snapshot = cart.snapshot();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "lines": snapshot.lines,
            "itemCount": snapshot.item_count.to_string(),
            "subtotal": snapshot.subtotal.minor_units().to_string(),
        }));
        return;
    }

    ctx.output.header("Cart");
    if snapshot.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    ctx.output.columns(&["ID", "NAME", "QTY", "PRICE", "SUBTOTAL"], &CART_WIDTHS);
    ctx.output.rule(&CART_WIDTHS);
    for line in &snapshot.lines {
        ctx.output.row(
            &[
                Cell::from(line.product.id.to_string()),
                Cell::from(line.product.name.as_str()),
                Cell::from(line.quantity.to_string()),
                Cell::from(line.product.unit_price().display()),
                Cell::from(line.line_total().display()),
            ],
            &CART_WIDTHS,
        );
    }

    ctx.output.info("");
    ctx.output.kv("Items", &snapshot.item_count.to_string());
    ctx.output.kv("Subtotal", &snapshot.subtotal.display());
    ctx.output.kv("Shipping", "Free");
    ctx.output.kv("Total", &snapshot.subtotal.display());
}
