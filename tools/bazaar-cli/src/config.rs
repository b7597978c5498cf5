//! Server configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bazaar_commerce::checkout::PricingPolicy;
use bazaar_commerce::Currency;
use bazaar_observability::LogConfig;

pub const ENV_JWT_SECRET: &str = "BAZAAR_JWT_SECRET";
pub const ENV_PAYMENT_KEY_ID: &str = "BAZAAR_PAYMENT_KEY_ID";
pub const ENV_PAYMENT_KEY_SECRET: &str = "BAZAAR_PAYMENT_KEY_SECRET";

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["bazaar.toml", ".bazaar.toml", "bazaar.json"];

/// `bazaar.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub logging: LogConfig,

    /// Shipping and tax rules, in minor units.
    #[serde(default)]
    pub pricing: PricingPolicy,
}

impl AppConfig {
    /// Load config from a file (JSON when the extension says so, TOML otherwise).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content, is_json(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Replace secrets with values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(secret) = lookup(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
        if let Some(key_id) = lookup(ENV_PAYMENT_KEY_ID) {
            self.payment.key_id = key_id;
        }
        if let Some(key_secret) = lookup(ENV_PAYMENT_KEY_SECRET) {
            self.payment.key_secret = key_secret;
        }
    }

    /// Errors block `serve`; warnings are printed.
    pub fn validate(&self) -> Validation {
        let mut report = Validation::default();

        if self.server.port == 0 {
            report.errors.push("server.port must be positive".to_string());
        }
        if self.server.host.trim().is_empty() {
            report.errors.push("server.host is required".to_string());
        }
        if self.auth.jwt_secret.trim().is_empty() {
            report
                .errors
                .push(format!("auth.jwt_secret is required (or set {ENV_JWT_SECRET})"));
        } else if self.auth.jwt_secret.len() < 16 {
            report
                .warnings
                .push("auth.jwt_secret is shorter than 16 characters".to_string());
        }
        if self.auth.token_ttl_hours <= 0 {
            report.errors.push("auth.token_ttl_hours must be positive".to_string());
        }
        if self.payment.key_secret.trim().is_empty() {
            report.errors.push(format!(
                "payment.key_secret is required (or set {ENV_PAYMENT_KEY_SECRET})"
            ));
        }
        if self.payment.provider == PaymentProvider::Razorpay {
            if self.payment.key_id.trim().is_empty() {
                report.errors.push(format!(
                    "payment.key_id is required for razorpay (or set {ENV_PAYMENT_KEY_ID})"
                ));
            }
            if !self.payment.base_url.starts_with("http") {
                report
                    .errors
                    .push("payment.base_url must be an http(s) URL".to_string());
            }
        }
        if self.pricing.tax_rate_percent < 0 || self.pricing.flat_shipping < 0 {
            report
                .errors
                .push("pricing amounts must not be negative".to_string());
        }
        if self.store.seed_file.is_none() {
            report
                .warnings
                .push("store.seed_file not set, the catalog starts empty".to_string());
        }
        report
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Result of [`AppConfig::validate`].
#[derive(Debug, Default)]
pub struct Validation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub currency: Currency,
    /// JSON product list loaded at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_ttl_hours() -> i64 {
    bazaar_auth::DEFAULT_TOKEN_TTL_HOURS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_ttl_hours(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Razorpay,
    /// Local intents, signed with `key_secret`.
    #[default]
    Offline,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Razorpay => "razorpay",
            PaymentProvider::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub provider: PaymentProvider,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub key_id: String,
    /// Also the callback signing secret.
    #[serde(default)]
    pub key_secret: String,
}

fn default_base_url() -> String {
    bazaar_gateway::DEFAULT_BASE_URL.to_string()
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            provider: PaymentProvider::default(),
            base_url: default_base_url(),
            key_id: String::new(),
            key_secret: String::new(),
        }
    }
}

/// Generate a starter `bazaar.toml` with fresh secrets.
pub fn generate_default_config(jwt_secret: &str, payment_secret: &str) -> String {
    format!(
        r#"# Bazaar server configuration

[server]
host = "127.0.0.1"
port = 8080

[store]
currency = "INR"
# seed_file = "catalog.json"

[auth]
# Overridden by {ENV_JWT_SECRET}
jwt_secret = "{jwt_secret}"
token_ttl_hours = 24

[payment]
# "razorpay" or "offline"
provider = "offline"
base_url = "https://api.razorpay.com"
# Overridden by {ENV_PAYMENT_KEY_ID} / {ENV_PAYMENT_KEY_SECRET}
key_id = ""
key_secret = "{payment_secret}"

[logging]
# trace, debug, info, warn, error (RUST_LOG takes precedence)
level = "info"
# "json" or "human"
format = "human"

# Amounts in minor units (paise)
[pricing]
free_shipping_threshold = 100000
flat_shipping = 10000
tax_rate_percent = 18
"#
    )
}
