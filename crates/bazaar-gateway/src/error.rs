//! Gateway error types.

use bazaar_commerce::CommerceError;
use thiserror::Error;

/// Errors talking to the payment provider.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Provider answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Credentials or base URL missing.
    #[error("Gateway misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::ParseError(e.to_string())
        } else {
            GatewayError::RequestError(e.to_string())
        }
    }
}

impl From<GatewayError> for CommerceError {
    fn from(e: GatewayError) -> Self {
        CommerceError::PaymentInit(e.to_string())
    }
}
