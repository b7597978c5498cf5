//! CLI command implementations.

pub mod config;
pub mod serve;
pub mod sign;
pub mod token;

use clap::{Args, Subcommand};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Override the configured host.
    #[arg(long)]
    pub host: Option<String>,

    /// Override the configured port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the catalog seed file.
    #[arg(long)]
    pub seed: Option<String>,
}

/// Arguments for the token command.
#[derive(Args)]
pub struct TokenArgs {
    /// User ID to issue the token for.
    #[arg(short, long)]
    pub user: String,

    /// Role: customer, admin or super_admin.
    #[arg(short, long, default_value = "customer")]
    pub role: String,

    /// Lifetime in hours (default: from config).
    #[arg(long)]
    pub ttl_hours: Option<i64>,
}

/// Arguments for the sign command.
#[derive(Args)]
pub struct SignArgs {
    /// Payment intent ID (the provider order ID).
    #[arg(short, long)]
    pub intent: String,

    /// Provider payment ID.
    #[arg(short, long)]
    pub payment: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration (secrets masked).
    Show,
    /// Write a new config file with fresh secrets.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// Target file (`.json` writes JSON).
        #[arg(long, default_value = "bazaar.toml")]
        path: String,
    },
    /// Validate the config file.
    Validate,
}
