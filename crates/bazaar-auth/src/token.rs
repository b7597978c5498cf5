//! HS256 bearer tokens.

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use bazaar_commerce::{Principal, Role, UserId};

use crate::AuthError;

/// Token lifetime when none is configured.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    pub role: Role,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
}

impl Claims {
    /// Claims for `principal`, valid for `ttl` from now.
    pub fn for_principal(principal: &Principal, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: principal.user_id.to_string(),
            role: principal.role,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal::new(UserId::new(self.sub.clone()), self.role)
    }
}

/// Issues and validates tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.ttl = Duration::hours(hours);
        self
    }

    /// Issue a token for `principal`.
    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        self.encode(&Claims::for_principal(principal, self.ttl))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Validate signature and expiry, returning the caller.
    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".into()));
        }
        Ok(data.claims.principal())
    }

    /// Validate an `Authorization` header value of the form `Bearer <token>`.
    pub fn validate_header(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.validate(token)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

/// Random 256-bit secret, base64 encoded.
pub fn generate_secret() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(bytes)
}
