//! Payment Gateway Adapter contract.
//!
//! The gateway creates a remote payment intent at checkout and verifies the
//! signed callback that confirms it.

mod gateway;
mod signature;

pub use gateway::{OfflineGateway, PaymentGateway, PaymentIntent};
pub use signature::SignatureVerifier;
