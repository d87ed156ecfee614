//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::account::Account;
use crate::domain::value_object::{
    account_id::AccountId, account_password::AccountPassword, email::Email,
};
use crate::error::UsersResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account; a duplicate email fails with `EmailTaken`
    async fn create(&self, account: &Account) -> UsersResult<()>;

    async fn find_by_email(&self, email: &Email) -> UsersResult<Option<Account>>;

    /// Return the account for `email`, inserting `candidate` if none exists.
    ///
    /// Must be atomic with respect to concurrent callers: exactly one
    /// account exists for the email afterwards. The flag reports whether
    /// `candidate` was the one inserted.
    async fn get_or_create(&self, candidate: &Account) -> UsersResult<(Account, bool)>;

    async fn update_password(
        &self,
        account_id: &AccountId,
        password: &AccountPassword,
    ) -> UsersResult<()>;

    async fn record_login(&self, account_id: &AccountId, at: DateTime<Utc>) -> UsersResult<()>;
}
