//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod order;

use clap::{Args, Subcommand};
use petal_commerce::catalog::ProductCategory;
use petal_commerce::checkout::FormField;
use petal_commerce::ids::ProductId;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Only list one category (jewellery, nails).
    #[arg(short, long)]
    pub category: Option<ProductCategory>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product id.
    pub id: ProductId,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id.
    pub id: ProductId,

    /// How many to add. Bounded by stock, like the product page selector.
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product id.
    pub id: ProductId,
}

/// Arguments for the set command.
#[derive(Args)]
pub struct SetArgs {
    /// Product id.
    pub id: ProductId,

    /// New quantity. Zero or less removes the line.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Full name.
    #[arg(long)]
    pub name: Option<String>,

    /// Email address.
    #[arg(long)]
    pub email: Option<String>,

    /// Street address.
    #[arg(long)]
    pub street: Option<String>,

    /// City.
    #[arg(long)]
    pub city: Option<String>,

    /// State.
    #[arg(long)]
    pub state: Option<String>,

    /// Postal code.
    #[arg(long)]
    pub postal_code: Option<String>,

    /// Forward the order summary through the messaging relay.
    #[arg(long)]
    pub relay: bool,

    /// Don't prompt for missing fields.
    #[arg(long)]
    pub no_input: bool,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

impl CheckoutArgs {
    /// Field values given on the command line.
    pub fn fields(&self) -> [(FormField, Option<&String>); 6] {
        [
            (FormField::Name, self.name.as_ref()),
            (FormField::Email, self.email.as_ref()),
            (FormField::Street, self.street.as_ref()),
            (FormField::City, self.city.as_ref()),
            (FormField::State, self.state.as_ref()),
            (FormField::PostalCode, self.postal_code.as_ref()),
        ]
    }
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default petal.toml in the current directory
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },

    /// Set a value (storage.slot_key, storage.data_dir, relay.endpoint)
    Set {
        /// Dotted key.
        key: String,
        /// New value.
        value: String,
    },

    /// Print the path of the loaded config file
    Path,
}
