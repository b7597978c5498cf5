//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart, stock and order operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product, variant, cart entry or order absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    CartEmpty,

    /// Requested quantity exceeds the stock ledger.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },

    /// Disallowed order status change.
    #[error("Invalid order transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Caller is neither the owner nor an administrator.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Payment signature mismatch.
    #[error("Payment verification failed")]
    VerificationFailed,

    /// Malformed input.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Upstream payment provider failed to create an intent.
    #[error("Payment initialization failed: {0}")]
    PaymentInit(String),

    /// A record changed between read and write.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CommerceError {
    /// Shorthand for a missing product.
    pub fn product_not_found(id: impl Into<String>) -> Self {
        CommerceError::NotFound {
            entity: "Product",
            id: id.into(),
        }
    }

    /// Shorthand for a missing variant.
    pub fn variant_not_found(id: impl Into<String>) -> Self {
        CommerceError::NotFound {
            entity: "Variant",
            id: id.into(),
        }
    }

    /// Shorthand for a missing order.
    pub fn order_not_found(id: impl Into<String>) -> Self {
        CommerceError::NotFound {
            entity: "Order",
            id: id.into(),
        }
    }

    /// HTTP-style status for the boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            CommerceError::NotFound { .. } => 404,
            CommerceError::Unauthorized(_) => 401,
            CommerceError::Forbidden(_) => 403,
            CommerceError::ConcurrentModification(_) => 409,
            CommerceError::PaymentInit(_) => 502,
            CommerceError::Storage(_) | CommerceError::Overflow => 500,
            CommerceError::CartEmpty
            | CommerceError::InsufficientStock { .. }
            | CommerceError::InvalidTransition { .. }
            | CommerceError::VerificationFailed
            | CommerceError::ValidationError(_)
            | CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit(..)
            | CommerceError::CurrencyMismatch { .. } => 400,
        }
    }

    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            CommerceError::NotFound { .. } => "NotFound",
            CommerceError::CartEmpty => "CartEmpty",
            CommerceError::InsufficientStock { .. } => "InsufficientStock",
            CommerceError::InvalidTransition { .. } => "InvalidTransition",
            CommerceError::Unauthorized(_) => "Unauthorized",
            CommerceError::Forbidden(_) => "Forbidden",
            CommerceError::VerificationFailed => "VerificationFailed",
            CommerceError::ValidationError(_)
            | CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit(..)
            | CommerceError::CurrencyMismatch { .. } => "ValidationError",
            CommerceError::PaymentInit(_) => "PaymentInitError",
            CommerceError::ConcurrentModification(_) => "ConcurrentModification",
            CommerceError::Storage(_) | CommerceError::Overflow => "InternalError",
        }
    }

    /// Whether the message may be shown to the caller verbatim.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CommerceError::Storage(_) | CommerceError::Overflow | CommerceError::PaymentInit(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CommerceError::CartEmpty.status_code(), 400);
        assert_eq!(CommerceError::order_not_found("o1").status_code(), 404);
        assert_eq!(CommerceError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(CommerceError::Storage("disk".into()).status_code(), 500);
    }

    #[test]
    fn test_quantity_errors_are_validation() {
        assert_eq!(CommerceError::InvalidQuantity(0).kind(), "ValidationError");
        assert_eq!(
            CommerceError::QuantityExceedsLimit(10_000, 9999).kind(),
            "ValidationError"
        );
    }

    #[test]
    fn test_insufficient_stock_message_names_product() {
        let err = CommerceError::InsufficientStock {
            product: "Cargo Pants".into(),
            requested: 6,
            available: 5,
        };
        assert!(err.to_string().contains("Cargo Pants"));
        assert!(!err.is_internal());
    }
}
