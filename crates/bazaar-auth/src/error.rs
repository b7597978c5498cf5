//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token on the request.
    #[error("authentication required")]
    MissingToken,

    /// Token malformed, wrongly signed or carrying bad claims.
    #[error("token invalid: {0}")]
    InvalidToken(String),

    /// Token expired.
    #[error("token expired")]
    TokenExpired,

    /// Signing key unusable.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Check if this is an authentication failure (as opposed to a server fault).
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::TokenExpired
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidKeyFormat | ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidEcdsaKey => {
                AuthError::Signing(e.to_string())
            }
            _ => AuthError::InvalidToken(e.to_string()),
        }
    }
}
