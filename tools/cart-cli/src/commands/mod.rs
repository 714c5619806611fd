//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod products;

use clap::{Args, Subcommand};

/// Arguments for commands that target a single product.
#[derive(Args)]
pub struct ProductArgs {
    /// Product id.
    pub id: u64,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product id.
    pub id: u64,

    /// New amount. Zero or less leaves the cart unchanged.
    #[arg(allow_hyphen_values = true)]
    pub amount: i64,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Only list products that are in the cart.
    #[arg(long)]
    pub in_cart: bool,
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
