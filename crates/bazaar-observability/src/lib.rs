//! Observability for Bazaar services.
//!
//! This crate provides:
//! - `init_logging` - `tracing` subscriber setup in JSON or human format
//! - `RequestId` - per-request correlation ID carried in `x-request-id`

mod error;
mod logging;
mod request_id;

pub use error::ObservabilityError;
pub use logging::*;
pub use request_id::*;
