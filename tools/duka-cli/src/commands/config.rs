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
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.storage_dir().display().to_string());
    ctx.output.kv("cart_key", &config.storage.cart_key);

    let latency = &config.backend.latency;
    ctx.output.info("[backend.latency]");
    for (key, ms) in [
        ("product_list_ms", latency.product_list_ms),
        ("product_detail_ms", latency.product_detail_ms),
        ("recommendation_ms", latency.recommendation_ms),
        ("order_list_ms", latency.order_list_ms),
        ("order_detail_ms", latency.order_detail_ms),
        ("order_submit_ms", latency.order_submit_ms),
        ("address_list_ms", latency.address_list_ms),
        ("address_create_ms", latency.address_create_ms),
    ] {
        ctx.output.kv(key, &ms.to_string());
    }

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output
        .kv("format", &format!("{:?}", config.logging.format).to_lowercase());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("duka.toml");

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
