//! Sign a payment confirmation the way the provider would.

use anyhow::{bail, Context as _, Result};

use bazaar_commerce::payment::SignatureVerifier;

use super::SignArgs;
use crate::context::Context;

pub fn run(args: SignArgs, ctx: &Context) -> Result<()> {
    let secret = &ctx.config.payment.key_secret;
    if secret.trim().is_empty() {
        bail!("payment.key_secret is not configured");
    }
    let signature = SignatureVerifier::new(secret)
        .sign(&args.intent, &args.payment)
        .context("Failed to sign payment")?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "razorpay_order_id": args.intent,
            "razorpay_payment_id": args.payment,
            "razorpay_signature": signature,
        }));
    } else {
        ctx.output.value("signature", &signature);
    }
    Ok(())
}
