//! Start the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use tracing::info;

use bazaar_api::AppState;
use bazaar_auth::TokenIssuer;
use bazaar_commerce::cart::CartService;
use bazaar_commerce::catalog::CatalogService;
use bazaar_commerce::checkout::OrderWorkflow;
use bazaar_commerce::payment::{OfflineGateway, PaymentGateway};
use bazaar_gateway::RazorpayGateway;
use bazaar_observability::init_logging;
use bazaar_store::MemoryStore;

use super::ServeArgs;
use crate::config::{AppConfig, PaymentProvider};
use crate::context::Context;

pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(seed) = args.seed {
        config.store.seed_file = Some(seed);
    }

    let report = config.validate();
    for warning in &report.warnings {
        ctx.output.warn(warning);
    }
    if !report.is_ok() {
        for error in &report.errors {
            ctx.output.error(error);
        }
        bail!("Configuration has {} error(s)", report.errors.len());
    }

    init_logging(&config.logging).context("Failed to initialise logging")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let store = Arc::new(MemoryStore::new());
    if let Some(seed) = &config.store.seed_file {
        let path = ctx.resolve_path(seed);
        store
            .seed_from_file(&path, config.store.currency)
            .await
            .with_context(|| format!("Failed to seed catalog from {}", path.display()))?;
    }

    let gateway = build_gateway(&config)?;
    info!(
        gateway = gateway.name(),
        currency = config.store.currency.code(),
        "Payment gateway ready"
    );

    let catalog = CatalogService::new(store.clone(), store.clone(), config.store.currency);
    let carts = CartService::new(store.clone(), store.clone(), config.store.currency);
    let orders = OrderWorkflow::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        gateway,
    )
    .with_pricing(config.pricing)
    .with_currency(config.store.currency);
    let tokens = TokenIssuer::new(&config.auth.jwt_secret).with_ttl_hours(config.auth.token_ttl_hours);

    ctx.output
        .success(&format!("Serving on http://{addr} (Ctrl-C to stop)"));
    bazaar_api::serve(addr, AppState::new(catalog, carts, orders, tokens))
        .await
        .context("Server failed")
}

fn build_gateway(config: &AppConfig) -> Result<Arc<dyn PaymentGateway>> {
    let payment = &config.payment;
    Ok(match payment.provider {
        PaymentProvider::Offline => Arc::new(OfflineGateway::new(&payment.key_secret)),
        PaymentProvider::Razorpay => Arc::new(
            RazorpayGateway::new(&payment.key_id, &payment.key_secret)
                .context("Failed to create payment gateway")?
                .with_base_url(&payment.base_url),
        ),
    })
}
