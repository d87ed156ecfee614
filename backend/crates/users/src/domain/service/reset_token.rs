//! Password Reset Tokens
//!
//! Tokens are never stored. A token is `<issued-at, base36>-<hex mac>`
//! where the MAC is HMAC-SHA256 over the account id, the email, the current
//! password hash and the issue time. Any change to the password hash
//! invalidates every token issued before it.

use chrono::Utc;
use platform::crypto::{constant_time_eq, hmac_sha256};
use std::fmt;
use std::time::Duration;

use crate::domain::entity::account::Account;

/// Stands in for the hash of an account without a usable password
const NO_PASSWORD_MARKER: &str = "!";

#[derive(Clone)]
pub struct ResetTokenGenerator {
    secret: [u8; 32],
    ttl: Duration,
}

impl ResetTokenGenerator {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn make_token(&self, account: &Account) -> String {
        self.make_token_at(account, now_secs())
    }

    pub fn check_token(&self, account: &Account, token: &str) -> bool {
        self.check_token_at(account, token, now_secs())
    }

    fn make_token_at(&self, account: &Account, issued_at: u64) -> String {
        format!(
            "{}-{}",
            to_base36(issued_at),
            self.signature(account, issued_at)
        )
    }

    fn check_token_at(&self, account: &Account, token: &str, now: u64) -> bool {
        let Some((ts, mac)) = token.trim().split_once('-') else {
            return false;
        };
        let Some(issued_at) = from_base36(ts) else {
            return false;
        };

        if issued_at > now || now - issued_at > self.ttl.as_secs() {
            return false;
        }

        let expected = self.signature(account, issued_at);
        constant_time_eq(expected.as_bytes(), mac.as_bytes())
    }

    fn signature(&self, account: &Account, issued_at: u64) -> String {
        let password = account
            .password
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or(NO_PASSWORD_MARKER);

        let data = format!(
            "{}\0{}\0{}\0{}",
            account.account_id,
            account.email.as_str(),
            password,
            issued_at
        );
        hex::encode(hmac_sha256(&self.secret, data.as_bytes()))
    }
}

impl fmt::Debug for ResetTokenGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetTokenGenerator")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<u64> {
    // 13 base36 digits already exceed u64
    if s.is_empty() || s.len() > 13 {
        return None;
    }
    // Only the form `to_base36` produces; no sign, no uppercase
    if !s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()) {
        return None;
    }
    u64::from_str_radix(s, 36).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        account_password::{AccountPassword, RawPassword},
        email::Email,
        role::Role,
    };

    const DAY: u64 = 24 * 3600;

    fn generator() -> ResetTokenGenerator {
        ResetTokenGenerator::new([7u8; 32], Duration::from_secs(3 * DAY))
    }

    fn account(email: &str, password: &str) -> Account {
        let raw = RawPassword::new(password.into()).unwrap();
        Account::new(
            Email::new(email).unwrap(),
            Role::Agent,
            AccountPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(from_base36("10"), Some(36));
        assert_eq!(from_base36(&to_base36(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(from_base36(""), None);
        assert_eq!(from_base36("!!"), None);
        assert_eq!(from_base36("+10"), None);
        assert_eq!(from_base36("1A"), None);
    }

    #[test]
    fn test_timestamp_spelling_is_not_malleable() {
        let tokens = generator();
        let a = account("a@x.com", "secret123");
        let issued = 1_700_000_000;
        let token = tokens.make_token_at(&a, issued);
        assert!(tokens.check_token_at(&a, &token, issued));

        let (ts, mac) = token.split_once('-').unwrap();
        assert!(ts.bytes().any(|b| b.is_ascii_lowercase()));
        assert!(!tokens.check_token_at(&a, &format!("+{token}"), issued));
        assert!(!tokens.check_token_at(&a, &format!("{}-{mac}", ts.to_uppercase()), issued));
    }

    #[test]
    fn test_token_valid_for_its_account() {
        let tokens = generator();
        let a = account("a@x.com", "secret123");
        let token = tokens.make_token(&a);
        assert!(tokens.check_token(&a, &token));
    }

    #[test]
    fn test_token_rejected_for_other_account() {
        let tokens = generator();
        let a = account("a@x.com", "secret123");
        let b = account("b@x.com", "secret123");
        let token = tokens.make_token(&a);
        assert!(!tokens.check_token(&b, &token));
    }

    #[test]
    fn test_token_invalidated_by_password_change() {
        let tokens = generator();
        let mut a = account("a@x.com", "secret123");
        let token = tokens.make_token(&a);

        let raw = RawPassword::new("newpass99".into()).unwrap();
        a.set_password(AccountPassword::from_raw(&raw, None).unwrap());
        assert!(!tokens.check_token(&a, &token));
    }

    #[test]
    fn test_token_expiry() {
        let tokens = generator();
        let a = account("a@x.com", "secret123");
        let issued = 1_700_000_000;
        let token = tokens.make_token_at(&a, issued);

        assert!(tokens.check_token_at(&a, &token, issued + 3 * DAY));
        assert!(!tokens.check_token_at(&a, &token, issued + 3 * DAY + 1));
        // Issued in the future
        assert!(!tokens.check_token_at(&a, &token, issued - 1));
    }

    #[test]
    fn test_token_secret_matters() {
        let a = account("a@x.com", "secret123");
        let token = generator().make_token(&a);
        let other = ResetTokenGenerator::new([8u8; 32], Duration::from_secs(DAY));
        assert!(!other.check_token(&a, &token));
    }

    #[test]
    fn test_malformed_tokens() {
        let tokens = generator();
        let a = account("a@x.com", "secret123");
        assert!(!tokens.check_token(&a, ""));
        assert!(!tokens.check_token(&a, "nodash"));
        assert!(!tokens.check_token(&a, "-abcdef"));
        assert!(!tokens.check_token(&a, "zzzzzzzzzzzzzzzz-00"));
    }

    #[test]
    fn test_social_account_tokens() {
        let tokens = generator();
        let s = Account::new_social(Email::new("s@x.com").unwrap());
        let token = tokens.make_token(&s);
        assert!(tokens.check_token(&s, &token));
    }
}
