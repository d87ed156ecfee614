//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of clear text on drop
//! - Optional application-wide pepper
//!
//! Structural checks (empty, too long, control characters) happen when a
//! [`ClearTextPassword`] is built. Strength rules such as the minimum
//! length are opt-in per use case via [`ClearTextPassword::ensure_min_length`],
//! which counts the characters as submitted, before normalization.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length for newly chosen passwords
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters long.")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters long.")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace.")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters.")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`, and its `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword {
    normalized: String,
    /// Code points of the input before NFKC
    submitted_chars: usize,
}

impl ClearTextPassword {
    /// Normalize (NFKC) and structurally validate a password.
    ///
    /// Rejects empty or whitespace-only input, more than
    /// [`MAX_PASSWORD_LENGTH`] code points, and control characters other
    /// than space, tab and newline.
    pub fn new(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let submitted_chars = raw.chars().count();
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self {
            normalized,
            submitted_chars,
        })
    }

    /// Length in Unicode code points as submitted
    pub fn char_count(&self) -> usize {
        self.submitted_chars
    }

    /// Require at least `min` code points in the submitted input
    pub fn ensure_min_length(&self, min: usize) -> Result<(), PasswordPolicyError> {
        let actual = self.char_count();
        if actual < min {
            return Err(PasswordPolicyError::TooShort { min, actual });
        }
        Ok(())
    }

    /// Compare against another clear text value without leaking timing
    pub fn matches(&self, other: &ClearTextPassword) -> bool {
        crate::crypto::constant_time_eq(self.normalized.as_bytes(), other.normalized.as_bytes())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.normalized.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash the password using Argon2id with a fresh 128-bit salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = self.peppered(pepper);
        let salt = SaltString::generate(OsRng);

        // OWASP defaults: m=19456 (19 MiB), t=2, p=1
        let result = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format (algorithm, version, params, salt, hash)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash.
    ///
    /// `pepper` must match the one used during hashing.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let mut password_bytes = password.peppered(pepper);
        // Argon2 compares in constant time internally
        let ok = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();
        password_bytes.zeroize();
        ok
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
        assert!(ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH)).is_ok());
    }

    #[test]
    fn test_password_empty_or_whitespace() {
        assert_eq!(
            ClearTextPassword::new(String::new()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            ClearTextPassword::new("        ".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defgh".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_short_passwords_are_structurally_valid() {
        let password = clear("wrong");
        assert_eq!(password.char_count(), 5);
        assert_eq!(
            password.ensure_min_length(MIN_PASSWORD_LENGTH).unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 5 }
        );
    }

    #[test]
    fn test_min_length_counts_code_points() {
        // 8 code points, 24 bytes
        let password = clear("パスワード安全だ");
        assert_eq!(password.char_count(), 8);
        assert!(password.ensure_min_length(MIN_PASSWORD_LENGTH).is_ok());
    }

    #[test]
    fn test_min_length_ignores_normalization() {
        // Each ligature expands to "ff" under NFKC
        let ligatures = clear(&"\u{FB00}".repeat(4));
        assert_eq!(ligatures.char_count(), 4);
        assert!(ligatures.ensure_min_length(MIN_PASSWORD_LENGTH).is_err());

        // Each pair composes to a single "é" under NFKC
        let combining = clear(&"e\u{301}".repeat(4));
        assert_eq!(combining.char_count(), 8);
        assert!(combining.ensure_min_length(MIN_PASSWORD_LENGTH).is_ok());
    }

    #[test]
    fn test_nfkc_normalization() {
        // Fullwidth letters normalize to ASCII
        let fullwidth = clear("ｓｅｃｒｅｔ１２３");
        assert!(fullwidth.matches(&clear("secret123")));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = clear("secret123");
        let hashed = password.hash(None).unwrap();

        assert_ne!(hashed.as_phc_string(), "secret123");
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.verify(&password, None));
        assert!(!hashed.verify(&clear("wrong"), None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = clear("TestPassword123!");
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_same_password_different_salts() {
        let password = clear("secret123");
        let a = password.hash(None).unwrap();
        let b = password.hash(None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = clear("TestPassword123!");
        let hashed = password.hash(None).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password, None));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = clear("supersecret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("supersecret"));

        let hashed = password.hash(None).unwrap();
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }
}
