use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservabilityError {
    #[error("Unknown log level: {0}")]
    InvalidLevel(String),

    #[error("Unknown log format: {0} (expected json or human)")]
    InvalidFormat(String),

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed.
    #[error("Logging already initialised: {0}")]
    AlreadyInitialised(String),
}
