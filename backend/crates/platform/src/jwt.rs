//! JWT signing and verification
//!
//! Thin HS256 wrapper around `jsonwebtoken`. Claim layout is left to the
//! caller; expiry (`exp`) is always validated on decode.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),
}

/// HMAC-SHA256 key pair derived from one shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(JwtError::Signing)
    }

    /// Decode and check signature and expiry
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, JwtError> {
        decode::<C>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(JwtError::Rejected)
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("algorithm", &"HS256")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        exp: u64,
    }

    fn now() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    #[test]
    fn test_sign_and_verify() {
        let keys = JwtKeys::from_secret(b"test-secret");
        let claims = TestClaims {
            sub: "account-1".into(),
            exp: now() + 60,
        };

        let token = keys.sign(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(keys.verify::<TestClaims>(&token).unwrap(), claims);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtKeys::from_secret(b"one")
            .sign(&TestClaims {
                sub: "x".into(),
                exp: now() + 60,
            })
            .unwrap();

        let result = JwtKeys::from_secret(b"two").verify::<TestClaims>(&token);
        assert!(matches!(result, Err(JwtError::Rejected(_))));
    }

    #[test]
    fn test_expired_rejected() {
        let keys = JwtKeys::from_secret(b"test-secret");
        let token = keys
            .sign(&TestClaims {
                sub: "x".into(),
                exp: now() - 10,
            })
            .unwrap();

        assert!(keys.verify::<TestClaims>(&token).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let keys = JwtKeys::from_secret(b"very-secret-value");
        assert!(!format!("{:?}", keys).contains("very-secret-value"));
    }
}
