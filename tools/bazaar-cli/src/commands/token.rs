//! Issue a bearer token.

use anyhow::{bail, Context as _, Result};

use bazaar_auth::TokenIssuer;
use bazaar_commerce::{Principal, Role};

use super::TokenArgs;
use crate::context::Context;

pub fn run(args: TokenArgs, ctx: &Context) -> Result<()> {
    let secret = &ctx.config.auth.jwt_secret;
    if secret.trim().is_empty() {
        bail!("auth.jwt_secret is not configured. Run `bazaar config init` first.");
    }
    let role: Role = args.role.parse().context("Invalid --role")?;
    let ttl = args.ttl_hours.unwrap_or(ctx.config.auth.token_ttl_hours);
    if ttl <= 0 {
        bail!("Token lifetime must be positive, got {ttl}");
    }

    let principal = Principal::new(args.user.as_str(), role);
    let token = TokenIssuer::new(secret)
        .with_ttl_hours(ttl)
        .issue(&principal)
        .context("Failed to sign token")?;

    ctx.output.debug(&format!(
        "Issued {} token for {} ({}h)",
        role.as_str(),
        principal.user_id,
        ttl
    ));
    ctx.output.value("token", &token);
    Ok(())
}
