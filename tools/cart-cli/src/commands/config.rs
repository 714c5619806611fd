//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv(
        "inventory_timeout_ms",
        &ctx.config.api.inventory_timeout_ms.to_string(),
    );
    ctx.output.kv(
        "catalog_timeout_ms",
        &ctx.config.api.catalog_timeout_ms.to_string(),
    );
    ctx.output
        .kv("max_retries", &ctx.config.api.max_retries.to_string());
    if let Some(ms) = ctx.config.api.backoff_ms {
        ctx.output.kv("backoff_ms", &ms.to_string());
    }

    ctx.output.info("[storage]");
    ctx.output
        .kv("data_dir", &ctx.data_dir().display().to_string());
    ctx.output.kv("cart_key", &ctx.config.storage.cart_key);

    ctx.output.info("[logging]");
    ctx.output.kv("log_level", &ctx.config.logging.log_level);
    ctx.output
        .kv("log_format", &ctx.config.logging.log_format.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("cart.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
