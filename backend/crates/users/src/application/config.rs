//! Application Configuration

use std::fmt;
use std::time::Duration;

use platform::crypto::random_secret;
use platform::jwt::JwtKeys;

use crate::application::tokens::TokenIssuer;
use crate::domain::service::reset_token::ResetTokenGenerator;

/// Users application configuration
#[derive(Clone)]
pub struct UsersConfig {
    /// HS256 signing secret for access/refresh tokens
    pub jwt_secret: Vec<u8>,
    /// HMAC key for password reset tokens (32 bytes)
    pub reset_token_secret: [u8; 32],
    /// Access token lifetime (5 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (1 day)
    pub refresh_token_ttl: Duration,
    /// Reset token validity window (3 days)
    pub reset_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            reset_token_secret: [0u8; 32],
            access_token_ttl: Duration::from_secs(5 * 60),
            refresh_token_ttl: Duration::from_secs(24 * 3600),
            reset_token_ttl: Duration::from_secs(3 * 24 * 3600),
            password_pepper: None,
        }
    }
}

impl UsersConfig {
    /// Create config with random secrets
    pub fn with_random_secrets() -> Self {
        Self {
            jwt_secret: random_secret().to_vec(),
            reset_token_secret: random_secret(),
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn token_issuer(&self) -> TokenIssuer {
        TokenIssuer::new(
            JwtKeys::from_secret(&self.jwt_secret),
            self.access_token_ttl,
            self.refresh_token_ttl,
        )
    }

    pub fn reset_tokens(&self) -> ResetTokenGenerator {
        ResetTokenGenerator::new(self.reset_token_secret, self.reset_token_ttl)
    }
}

impl fmt::Debug for UsersConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsersConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("reset_token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("reset_token_ttl", &self.reset_token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = UsersConfig::default();
        assert_eq!(config.access_token_ttl, Duration::from_secs(300));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.reset_token_ttl, Duration::from_secs(259_200));
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = UsersConfig::with_random_secrets();
        let b = UsersConfig::with_random_secrets();
        assert_ne!(a.jwt_secret, b.jwt_secret);
        assert_ne!(a.reset_token_secret, b.reset_token_secret);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = UsersConfig {
            password_pepper: Some(b"pepper-value".to_vec()),
            ..UsersConfig::with_random_secrets()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pepper-value"));
        assert!(debug.contains("REDACTED"));
    }
}
