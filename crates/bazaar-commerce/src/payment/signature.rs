//! HMAC-SHA256 signatures over `intent_id|payment_id`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CommerceError;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies payment callbacks with a shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, intent_id: &str, payment_id: &str) -> Result<HmacSha256, CommerceError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| CommerceError::ValidationError(format!("invalid signing key: {e}")))?;
        mac.update(intent_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        Ok(mac)
    }

    /// Hex-encoded signature.
    pub fn sign(&self, intent_id: &str, payment_id: &str) -> Result<String, CommerceError> {
        let mac = self.mac(intent_id, payment_id)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time check of a hex signature. Malformed hex never matches.
    pub fn verify(&self, intent_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };
        match self.mac(intent_id, payment_id) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_verify() {
        let verifier = SignatureVerifier::new("test_secret");
        let sig = verifier.sign("order_abc", "pay_123").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verifier.verify("order_abc", "pay_123", &sig));
    }

    #[test]
    fn test_known_vector() {
        let verifier = SignatureVerifier::new("secret");
        let sig = verifier.sign("order_1", "pay_1").unwrap();
        assert_eq!(
            sig,
            "52115a0d3400de9e86aade1f1b6eba9e8974604f4e267a9e9a16633a4c8dd2cb"
        );
    }

    #[test]
    fn test_rejects_tampering() {
        let verifier = SignatureVerifier::new("test_secret");
        let sig = verifier.sign("order_abc", "pay_123").unwrap();
        assert!(!verifier.verify("order_abc", "pay_999", &sig));
        assert!(!verifier.verify("order_abc", "pay_123", "not-hex"));
        assert!(!verifier.verify("order_abc", "pay_123", ""));
        assert!(!SignatureVerifier::new("other").verify("order_abc", "pay_123", &sig));
    }
}
