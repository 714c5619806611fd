//! Cart CLI - Command line shopping cart for the storefront.
//!
//! Commands:
//! - `cart show` - Show the cart with subtotals and total
//! - `cart add` - Add one unit of a product
//! - `cart remove` - Remove a product from the cart
//! - `cart update` - Set a product's amount
//! - `cart increment` / `cart decrement` - Step a product's amount
//! - `cart products` - List the catalog with in-cart amounts
//! - `cart config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use cart_core::CartError;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, ProductArgs, ProductsArgs, UpdateArgs};

/// Cart CLI - Manage a stock-checked storefront cart
#[derive(Parser)]
#[command(name = "cart")]
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
    /// Show the cart
    Show,

    /// Add one unit of a product
    Add(ProductArgs),

    /// Remove a product from the cart
    Remove(ProductArgs),

    /// Set the amount of a product already in the cart
    Update(UpdateArgs),

    /// Add one more unit of a product already in the cart
    Increment(ProductArgs),

    /// Take one unit of a product off the cart, keeping at least one
    Decrement(ProductArgs),

    /// List catalog products with their in-cart amounts
    Products(ProductsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    logging::init(&ctx.config.logging, cli.verbose)?;

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::cart::show(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::Update(args) => commands::cart::update(args, &ctx).await,
        Commands::Increment(args) => commands::cart::increment(args, &ctx).await,
        Commands::Decrement(args) => commands::cart::decrement(args, &ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        // Cart failures were already shown to the shopper as a notice.
        match e.downcast_ref::<CartError>() {
            Some(err) => ctx.output.debug(&err.to_string()),
            None => ctx.output.error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }

    Ok(())
}
