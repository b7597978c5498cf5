//! Provider response bodies.

use serde::Deserialize;

/// Order object returned by `POST /v1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error envelope `{"error": {"code", "description"}}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

/// Best human-readable message from an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match (envelope.error.code, envelope.error.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (None, Some(description)) => description,
            (Some(code), None) => code,
            (None, None) => body.to_string(),
        },
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}
