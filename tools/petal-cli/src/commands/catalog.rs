//! Catalog browsing commands.

use anyhow::{bail, Result};
use petal_commerce::catalog::Product;
use petal_commerce::gateway::{lookup_product, ProductLookup, StoreGateway};

use super::{CatalogArgs, ProductArgs};
use crate::context::Context;
use crate::output::{stock_badge, Cell};

const CATALOG_WIDTHS: [usize; 5] = [6, 24, 10, 12, 14];

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let products = match args.category {
        Some(category) => ctx.gateway.get_products_by_category(category).await?,
        None => ctx.gateway.get_all_products().await?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    let title = match args.category {
        Some(category) => category.label().to_string(),
        None => "Catalog".to_string(),
    };
    ctx.output.header(&title);

    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    ctx.output.columns(&["ID", "NAME", "CATEGORY", "PRICE", "STOCK"], &CATALOG_WIDTHS);
    ctx.output.rule(&CATALOG_WIDTHS);
    for product in &products {
        ctx.output.row(
            &[
                Cell::from(product.id.to_string()),
                Cell::from(product.name.as_str()),
                Cell::from(product.category.label()),
                Cell::from(product.unit_price().display()),
                stock_badge(product.stock_quantity),
            ],
            &CATALOG_WIDTHS,
        );
    }

    ctx.output.info("");
    ctx.output.info(&format!("Total: {} product(s)", products.len()));
    Ok(())
}

/// Run the product command.
pub async fn show(args: ProductArgs, ctx: &Context) -> Result<()> {
    let product = match lookup_product(&ctx.gateway, args.id).await? {
        ProductLookup::Found(product) => product,
        ProductLookup::NotFound(id) => bail!("Product not found: {}", id),
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    print_product(&product, ctx);
    Ok(())
}

fn print_product(product: &Product, ctx: &Context) {
    ctx.output.header(&product.name);
    ctx.output.kv("ID", &product.id.to_string());
    ctx.output.kv("Category", product.category.label());
    ctx.output.kv("Price", &product.unit_price().display());
    ctx.output.kv("Stock", stock_badge(product.stock_quantity));
    ctx.output.kv("Image", product.display_image_url());
    if !product.tags.is_empty() {
        ctx.output.kv("Tags", &product.tags.join(", "));
    }
    if !product.description.is_empty() {
        ctx.output.info("");
        ctx.output.info(&product.description);
    }
    if product.is_out_of_stock() {
        ctx.output.warn("This product is out of stock.");
    }
}
