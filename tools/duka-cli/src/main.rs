//! duka - command-line storefront.
//!
//! Commands:
//! - `duka products` - Browse the catalog
//! - `duka cart` - Inspect and edit the persisted cart
//! - `duka checkout` - Place an order for the cart contents
//! - `duka orders` - Order history
//! - `duka addresses` - Saved addresses
//! - `duka config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{AddressesArgs, CartArgs, CheckoutArgs, ConfigArgs, OrdersArgs, ProductsArgs};
use config::{LogFormat, LoggingConfig};

/// duka - shop from the terminal
#[derive(Parser)]
#[command(name = "duka")]
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
    /// Browse the product catalog
    Products(ProductsArgs),

    /// Show or edit the shopping cart
    Cart(CartArgs),

    /// Check out the cart
    Checkout(CheckoutArgs),

    /// View order history
    Orders(OrdersArgs),

    /// Manage saved addresses
    Addresses(AddressesArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Environment variable holding a log filter, e.g. `duka_commerce=debug`.
const LOG_ENV: &str = "DUKA_LOG";

fn init_logging(config: &LoggingConfig, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_logging(&ctx.config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Addresses(args) => commands::addresses::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
