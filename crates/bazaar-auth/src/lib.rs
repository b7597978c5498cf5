//! Bearer tokens for Bazaar.
//!
//! Tokens are HS256 JWTs carrying the user ID and role. Validating one yields
//! the [`Principal`](bazaar_commerce::Principal) passed into every cart and
//! order operation.

mod error;
mod token;

pub use error::AuthError;
pub use token::{generate_secret, Claims, TokenIssuer, DEFAULT_TOKEN_TTL_HOURS};
