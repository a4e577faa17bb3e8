//! CLI command implementations.

pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod products;

use clap::{Args, Subcommand};
use duka_commerce::account::AddressLabel;
use duka_commerce::catalog::SortOption;

/// Parse a `name=value` variant attribute.
fn parse_attr(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected name=value, got '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally filtered and sorted.
    List {
        /// Match name or description, ignoring case.
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category.
        #[arg(short, long)]
        category: Option<String>,

        /// newest, price-low, price-high or name.
        #[arg(long)]
        sort: Option<SortOption>,

        /// Minimum price in shillings.
        #[arg(long)]
        min: Option<i64>,

        /// Maximum price in shillings.
        #[arg(long)]
        max: Option<i64>,

        /// Hide products that are out of stock.
        #[arg(long)]
        in_stock: bool,

        /// Only discounted products.
        #[arg(long)]
        on_sale: bool,

        /// Only featured products.
        #[arg(long)]
        featured: bool,

        /// Show at most this many products.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show one product.
    Show {
        /// Product ID.
        id: String,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart (default).
    Show,
    /// Add a product to the cart.
    Add {
        /// Product ID.
        product_id: String,

        /// Units to add.
        #[arg(short, long, default_value = "1")]
        quantity: i64,

        /// Variant option, e.g. `--attr color=Black`. Repeatable.
        #[arg(long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Remove a line from the cart.
    Remove {
        /// Product ID.
        product_id: String,

        /// Variant option of the line to remove.
        #[arg(long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Set the quantity of a line; zero removes it.
    Update {
        /// Product ID.
        product_id: String,

        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Variant option of the line to update.
        #[arg(long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// TOML file with the checkout form fields.
    #[arg(short, long)]
    pub form: String,

    /// Pre-fill the shipping address from a saved address.
    #[arg(short, long)]
    pub address: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first (default).
    List,
    /// Show order details.
    Show {
        /// Order number, e.g. ORD-1234-ABCD.
        id: String,
    },
}

/// Arguments for the addresses command.
#[derive(Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: Option<AddressesCommand>,
}

#[derive(Subcommand)]
pub enum AddressesCommand {
    /// List saved addresses (default).
    List,
    /// Save a new address.
    Add(NewAddressArgs),
}

/// Fields of a new address. Missing required fields are reported together.
#[derive(Args)]
pub struct NewAddressArgs {
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub line1: String,
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long, default_value = "")]
    pub city: String,
    /// County or state.
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub postal_code: String,
    #[arg(long, default_value = "Kenya")]
    pub country: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// home, work or other.
    #[arg(long)]
    pub label: Option<AddressLabel>,
    /// Make this the default address.
    #[arg(long)]
    pub default: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
