//! Petal CLI - a terminal storefront.
//!
//! Commands:
//! - `petal catalog` - List products
//! - `petal product` - Show one product
//! - `petal add` / `remove` / `set` / `clear` - Edit the cart
//! - `petal cart` - Show the cart
//! - `petal checkout` - Place an order
//! - `petal order` - Show the last order confirmation
//! - `petal config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AddArgs, CatalogArgs, CheckoutArgs, ClearArgs, ConfigArgs, ProductArgs, RemoveArgs, SetArgs,
};

/// Petal CLI - Browse, cart and order from the terminal
#[derive(Parser)]
#[command(name = "petal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the catalog
    Catalog(CatalogArgs),

    /// Show a product
    Product(ProductArgs),

    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Set a cart line's quantity
    Set(SetArgs),

    /// Empty the cart
    Clear(ClearArgs),

    /// Show the cart
    Cart,

    /// Place an order for the cart
    Checkout(CheckoutArgs),

    /// Show the last order confirmation
    Order,

    /// Manage configuration
    Config(ConfigArgs),
}

/// Log filter from `PETAL_LOG`, falling back to `warn` (or `debug` when verbose).
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env("PETAL_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), output)?;
    ctx.seed_catalog().await?;

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Product(args) => commands::catalog::show(args, &ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::Set(args) => commands::cart::set(args, &ctx).await,
        Commands::Clear(args) => commands::cart::clear(args, &ctx).await,
        Commands::Cart => commands::cart::show(&ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Order => commands::order::run(&ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    let saved = ctx.save_gateway();
    if let Err(e) = result.and(saved) {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
