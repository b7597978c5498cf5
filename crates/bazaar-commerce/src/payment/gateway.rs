//! Gateway trait and the local offline gateway.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CommerceError;
use crate::money::Money;
use crate::payment::SignatureVerifier;

/// A remote handle for a pending charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Gateway-issued intent ID.
    pub id: String,
    /// Amount in minor units, with currency.
    pub amount: Money,
    /// Our receipt reference (the order ID).
    pub receipt: String,
}

/// External payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent. Upstream failures map to `PaymentInit`.
    async fn create_intent(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<PaymentIntent, CommerceError>;

    /// Check a callback signature over `intent_id|payment_id`.
    fn verify_signature(&self, intent_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

/// Issues intents locally and verifies with a shared secret.
#[derive(Debug, Clone)]
pub struct OfflineGateway {
    verifier: SignatureVerifier,
}

impl OfflineGateway {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            verifier: SignatureVerifier::new(secret),
        }
    }

    /// Sign a callback the way the provider would.
    pub fn sign(&self, intent_id: &str, payment_id: &str) -> Result<String, CommerceError> {
        self.verifier.sign(intent_id, payment_id)
    }
}

#[async_trait]
impl PaymentGateway for OfflineGateway {
    async fn create_intent(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<PaymentIntent, CommerceError> {
        if !amount.is_positive() {
            return Err(CommerceError::PaymentInit(format!(
                "amount must be positive, got {}",
                amount.amount_minor
            )));
        }
        let id = format!("order_{}", hex::encode(rand::random::<[u8; 7]>()));
        debug!(intent_id = %id, receipt, amount = amount.amount_minor, "Offline intent created");
        Ok(PaymentIntent {
            id,
            amount,
            receipt: receipt.to_string(),
        })
    }

    fn verify_signature(&self, intent_id: &str, payment_id: &str, signature: &str) -> bool {
        self.verifier.verify(intent_id, payment_id, signature)
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
