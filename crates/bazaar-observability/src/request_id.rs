//! Request correlation IDs.

use std::fmt;

use http::{HeaderMap, HeaderValue};

/// Header carrying the request ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_LEN: usize = 128;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new request ID (32 hex chars).
    pub fn generate() -> Self {
        Self(hex::encode(rand::random::<[u8; 16]>()))
    }

    /// Accept a caller-supplied ID if it is short printable ASCII.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        let valid = !id.is_empty()
            && id.len() <= MAX_LEN
            && id.bytes().all(|b| b.is_ascii_graphic());
        valid.then(|| Self(id.to_string()))
    }

    /// The incoming header value when acceptable, otherwise a fresh ID.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::parse)
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0).ok()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = RequestId::generate();
        assert_eq!(a.as_str().len(), 32);
        assert_ne!(a, RequestId::generate());
    }

    #[test]
    fn test_header_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(RequestId::from_headers(&headers).as_str(), "abc-123");
    }

    #[test]
    fn test_bad_header_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("has space"));
        let id = RequestId::from_headers(&headers);
        assert_ne!(id.as_str(), "has space");
        assert!(RequestId::parse(&"x".repeat(200)).is_none());
        assert!(RequestId::parse("  ").is_none());
    }
}
