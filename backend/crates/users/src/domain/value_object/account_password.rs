//! Account Password Value Objects
//!
//! Domain wrappers over `platform::password`. [`RawPassword`] is user input
//! (zeroized on drop); [`AccountPassword`] is the Argon2id hash persisted in
//! the store.

use platform::password::{
    ClearTextPassword, HashedPassword, MIN_PASSWORD_LENGTH, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

/// Password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Structural checks only; see [`RawPassword::ensure_strength`]
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    /// Length rule applied to passwords chosen through the reset flow
    pub fn ensure_strength(&self) -> Result<(), PasswordPolicyError> {
        self.0.ensure_min_length(MIN_PASSWORD_LENGTH)
    }

    /// Constant-time equality, used for the confirmation field
    pub fn matches(&self, other: &RawPassword) -> bool {
        self.0.matches(&other.0)
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed password for storage
#[derive(Clone, PartialEq, Eq)]
pub struct AccountPassword(HashedPassword);

impl AccountPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> Result<Self, PasswordHashError> {
        raw.0.hash(pepper).map(Self)
    }

    /// Restore from the PHC string kept in the database
    pub fn from_db(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_phc_string(phc).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for AccountPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountPassword").field(&"[HASH]").finish()
    }
}
