//! Token Issuer
//!
//! Mints and checks the access/refresh JWT pair handed out at login.
//! Tokens are stateless; nothing is recorded per issued token.

use chrono::Utc;
use platform::jwt::{JwtError, JwtKeys};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::value_object::role::Role;
use crate::error::UsersResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    /// Account id
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub token_type: TokenType,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error("Expected a {expected:?} token")]
    WrongType { expected: TokenType },
}

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: JwtKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(keys: JwtKeys, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            keys,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue(&self, account: &Account) -> UsersResult<TokenPair> {
        Ok(TokenPair {
            refresh: self.sign(account, TokenType::Refresh, self.refresh_ttl)?,
            access: self.sign(account, TokenType::Access, self.access_ttl)?,
        })
    }

    /// Check signature, expiry and token type
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<AccountClaims, TokenError> {
        let claims: AccountClaims = self.keys.verify(token)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }
        Ok(claims)
    }

    fn sign(&self, account: &Account, token_type: TokenType, ttl: Duration) -> UsersResult<String> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = AccountClaims {
            sub: account.account_id.to_string(),
            email: account.email.to_string(),
            role: account.role,
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        };
        Ok(self.keys.sign(&claims)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::email::Email;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            JwtKeys::from_secret(b"issuer-secret"),
            Duration::from_secs(300),
            Duration::from_secs(86_400),
        )
    }

    fn account() -> Account {
        Account::new_social(Email::new("a@x.com").unwrap())
    }

    #[test]
    fn test_issue_pair() {
        let account = account();
        let pair = issuer().issue(&account).unwrap();
        assert!(!pair.access.is_empty());
        assert!(!pair.refresh.is_empty());
        assert_ne!(pair.access, pair.refresh);

        let claims = issuer().verify(&pair.access, TokenType::Access).unwrap();
        assert_eq!(claims.sub, account.account_id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::FootballPlayer);
        assert_eq!(claims.exp - claims.iat, 300);

        let refresh = issuer().verify(&pair.refresh, TokenType::Refresh).unwrap();
        assert_eq!(refresh.exp - refresh.iat, 86_400);
        assert_ne!(refresh.jti, claims.jti);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let pair = issuer().issue(&account()).unwrap();
        assert!(matches!(
            issuer().verify(&pair.refresh, TokenType::Access),
            Err(TokenError::WrongType { .. })
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let pair = issuer().issue(&account()).unwrap();
        let other = TokenIssuer::new(
            JwtKeys::from_secret(b"other"),
            Duration::from_secs(300),
            Duration::from_secs(300),
        );
        assert!(matches!(
            other.verify(&pair.access, TokenType::Access),
            Err(TokenError::Jwt(_))
        ));
    }
}
