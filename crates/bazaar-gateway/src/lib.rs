//! Razorpay-compatible payment gateway.
//!
//! Intents are provider "orders" created over HTTPS with basic auth.
//! Callback signatures are checked locally with the key secret, so
//! verification never leaves the process.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_gateway::RazorpayGateway;
//!
//! let gateway = RazorpayGateway::new("rzp_test_key", "secret")?
//!     .with_base_url("http://localhost:9000");
//! let intent = gateway.create_intent(order.total_price(), order.id.as_str()).await?;
//! ```

mod error;
mod request;
mod response;

pub use error::GatewayError;
pub use request::CreateOrderRequest;
pub use response::ProviderOrder;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use bazaar_commerce::payment::{PaymentGateway, PaymentIntent, SignatureVerifier};
use bazaar_commerce::{CommerceError, Money};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the provider's orders API.
pub struct RazorpayGateway {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    verifier: SignatureVerifier,
}

impl RazorpayGateway {
    /// Create a gateway for the given API key pair.
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Result<Self, GatewayError> {
        let key_id = key_id.into();
        let key_secret = key_secret.into();
        if key_id.trim().is_empty() || key_secret.trim().is_empty() {
            return Err(GatewayError::Config("key id and key secret are required".into()));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            verifier: SignatureVerifier::new(&key_secret),
            key_id,
            key_secret,
        })
    }

    /// Point the gateway at another host (sandbox or test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /v1/orders`.
    pub async fn create_order(&self, body: &CreateOrderRequest) -> Result<ProviderOrder, GatewayError> {
        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::HttpError {
                status: status.as_u16(),
                message: response::error_message(&text),
            });
        }
        let order: ProviderOrder = response.json().await?;
        Ok(order)
    }
}

impl std::fmt::Debug for RazorpayGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayGateway")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
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

        let body = CreateOrderRequest::new(&amount, receipt);
        let order = match self.create_order(&body).await {
            Ok(order) => order,
            Err(err) => {
                warn!(receipt, error = %err, "Payment intent creation failed");
                return Err(err.into());
            }
        };
        if order.amount != amount.amount_minor {
            warn!(
                intent_id = %order.id,
                requested = amount.amount_minor,
                returned = order.amount,
                "Provider returned a different amount"
            );
        }

        debug!(intent_id = %order.id, receipt, amount = amount.amount_minor, "Payment intent created");
        Ok(PaymentIntent {
            id: order.id,
            amount,
            receipt: receipt.to_string(),
        })
    }

    fn verify_signature(&self, intent_id: &str, payment_id: &str, signature: &str) -> bool {
        self.verifier.verify(intent_id, payment_id, signature)
    }

    fn name(&self) -> &'static str {
        "razorpay"
    }
}
