//! Configuration management commands.

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{self, generate_default_config};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Path => show_path(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("slot_key", &ctx.config.storage.slot_key);
    ctx.output.kv("data_dir", &ctx.config.storage.data_dir);

    ctx.output.info("");
    ctx.output.info("[relay]");
    ctx.output.kv("endpoint", &ctx.config.relay.endpoint);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("petal.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output.success(&format!("Created {}", config_path.display()));
    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = &ctx.config_path else {
        bail!("No config file found. Run `petal config init` first.");
    };

    let mut config = config::load(path)?;
    let slot = match key {
        "storage.slot_key" => &mut config.storage.slot_key,
        "storage.data_dir" => &mut config.storage.data_dir,
        "relay.endpoint" => &mut config.relay.endpoint,
        _ => bail!("Unknown config key: {}", key),
    };
    if value.trim().is_empty() {
        bail!("{} cannot be empty", key);
    }
    *slot = value.to_string();

    config::save(&config, path)?;
    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) => println!("{}", path.display()),
        None => ctx.output.info("No config file found; using defaults."),
    }
    Ok(())
}
