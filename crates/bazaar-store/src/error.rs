//! Storage error types.

use bazaar_commerce::CommerceError;
use thiserror::Error;

/// Errors raised by the storage backend itself.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read a seed file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not a valid product list.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// A key that must be unique is already taken.
    #[error("Duplicate {entity}: {key}")]
    Duplicate { entity: &'static str, key: String },

    /// Injected failure (tests).
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// A record failed domain validation.
    #[error(transparent)]
    Invalid(#[from] CommerceError),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::DeserializeError(e.to_string())
    }
}

impl From<StoreError> for CommerceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Invalid(inner) => inner,
            other => CommerceError::Storage(other.to_string()),
        }
    }
}
