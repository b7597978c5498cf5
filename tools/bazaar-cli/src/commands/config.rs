//! Configuration management commands.

use anyhow::{bail, Result};

use bazaar_auth::generate_secret;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, AppConfig};
use crate::context::Context;
use crate::output::mask_secret;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, path } => init_config(&path, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    if ctx.output.is_json() {
        let mut masked = config.clone();
        masked.auth.jwt_secret = mask_secret(&masked.auth.jwt_secret);
        masked.payment.key_secret = mask_secret(&masked.payment.key_secret);
        ctx.output.json(&masked);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[server]");
    ctx.output.kv("host", &config.server.host);
    ctx.output.kv("port", &config.server.port.to_string());

    ctx.output.info("[store]");
    ctx.output.kv("currency", config.store.currency.code());
    ctx.output
        .kv("seed_file", config.store.seed_file.as_deref().unwrap_or("(none)"));

    ctx.output.info("[auth]");
    ctx.output.kv("jwt_secret", &mask_secret(&config.auth.jwt_secret));
    ctx.output
        .kv("token_ttl_hours", &config.auth.token_ttl_hours.to_string());

    ctx.output.info("[payment]");
    ctx.output.kv("provider", config.payment.provider.as_str());
    ctx.output.kv("base_url", &config.payment.base_url);
    ctx.output.kv("key_id", &config.payment.key_id);
    ctx.output.kv("key_secret", &mask_secret(&config.payment.key_secret));

    ctx.output.info("[logging]");
    ctx.output.kv("level", config.logging.level.as_str());
    ctx.output.kv("format", config.logging.format.as_str());

    ctx.output.info("[pricing]");
    ctx.output.kv(
        "free_shipping_threshold",
        &config.pricing.free_shipping_threshold.to_string(),
    );
    ctx.output
        .kv("flat_shipping", &config.pricing.flat_shipping.to_string());
    ctx.output
        .kv("tax_rate_percent", &config.pricing.tax_rate_percent.to_string());
    Ok(())
}

fn init_config(path: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.resolve_path(path);
    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let jwt_secret = generate_secret();
    let payment_secret = generate_secret();
    if config_path.extension().is_some_and(|ext| ext == "json") {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = jwt_secret;
        config.payment.key_secret = payment_secret;
        config.save(&config_path)?;
    } else {
        std::fs::write(
            &config_path,
            generate_default_config(&jwt_secret, &payment_secret),
        )?;
    }

    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");
    let report = ctx.config.validate();

    if report.errors.is_empty() && report.warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }
    for error in &report.errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &report.warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }
    if !report.is_ok() {
        bail!("Configuration has {} error(s)", report.errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}
