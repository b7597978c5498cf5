//! Error-to-response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use bazaar_auth::AuthError;
use bazaar_commerce::CommerceError;

/// Anything a handler can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Body missing, not JSON, or wrong shape.
    #[error("Invalid request body: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Commerce(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Auth(e) if e.is_auth_failure() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Commerce(e) => e.kind(),
            ApiError::Auth(e) if e.is_auth_failure() => "Unauthorized",
            ApiError::Auth(_) => "InternalError",
            ApiError::BadRequest(_) => "ValidationError",
        }
    }

    /// Text shown to the caller. Server-side faults get a generic message.
    fn public_message(&self) -> String {
        match self {
            ApiError::Commerce(CommerceError::PaymentInit(_)) => {
                "Payment provider unavailable, please retry".to_string()
            }
            ApiError::Commerce(e) if e.is_internal() => "Internal server error".to_string(),
            ApiError::Auth(e) if !e.is_auth_failure() => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            debug!(kind = self.kind(), error = %self, "Request rejected");
        }
        let body = json!({
            "success": false,
            "error": self.kind(),
            "message": self.public_message(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(CommerceError::CartEmpty);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "CartEmpty");

        let err = ApiError::from(AuthError::TokenExpired);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.kind(), "Unauthorized");

        let err = ApiError::from(CommerceError::Forbidden("admin only".into()));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = ApiError::from(CommerceError::Storage("disk /var/db full".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");

        let err = ApiError::from(CommerceError::PaymentInit("HTTP 401: bad key".into()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(!err.public_message().contains("bad key"));
    }

    #[test]
    fn test_domain_message_shown() {
        let err = ApiError::from(CommerceError::InsufficientStock {
            product: "Cargo Pants".into(),
            requested: 3,
            available: 1,
        });
        assert!(err.public_message().contains("Cargo Pants"));
    }
}
