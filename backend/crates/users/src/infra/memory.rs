//! In-Memory Repository Implementation
//!
//! Accounts keyed by normalized email behind one async lock. Used by
//! `serve --in-memory` and by the router tests.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId, account_password::AccountPassword, email::Email,
};
use crate::error::{UsersError, UsersResult};

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    /// Apply `f` to the account with `account_id`
    async fn modify(&self, account_id: &AccountId, f: impl FnOnce(&mut Account)) -> UsersResult<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|a| &a.account_id == account_id)
            .ok_or_else(|| UsersError::Internal(format!("Unknown account {}", account_id)))?;
        f(account);
        Ok(())
    }
}

impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: &Account) -> UsersResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(account.email.as_str()) {
            return Err(UsersError::EmailTaken);
        }
        accounts.insert(account.email.to_string(), account.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> UsersResult<Option<Account>> {
        Ok(self.accounts.read().await.get(email.as_str()).cloned())
    }

    async fn get_or_create(&self, candidate: &Account) -> UsersResult<(Account, bool)> {
        let mut accounts = self.accounts.write().await;
        if let Some(existing) = accounts.get(candidate.email.as_str()) {
            return Ok((existing.clone(), false));
        }
        accounts.insert(candidate.email.to_string(), candidate.clone());
        Ok((candidate.clone(), true))
    }

    async fn update_password(
        &self,
        account_id: &AccountId,
        password: &AccountPassword,
    ) -> UsersResult<()> {
        self.modify(account_id, |a| a.set_password(password.clone()))
            .await
    }

    async fn record_login(&self, account_id: &AccountId, at: DateTime<Utc>) -> UsersResult<()> {
        self.modify(account_id, |a| a.last_login = Some(at)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{account_password::RawPassword, role::Role};

    fn account(email: &str) -> Account {
        let raw = RawPassword::new("secret123".into()).unwrap();
        Account::new(
            Email::new(email).unwrap(),
            Role::Coach,
            AccountPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryAccountRepository::new();
        let a = account("a@x.com");
        repo.create(&a).await.unwrap();

        let by_email = repo.find_by_email(&a.email).await.unwrap().unwrap();
        assert_eq!(by_email.account_id, a.account_id);
        assert!(repo.find_by_email(&Email::new("b@x.com").unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryAccountRepository::new();
        repo.create(&account("a@x.com")).await.unwrap();
        let err = repo.create(&account("A@X.COM")).await.unwrap_err();
        assert!(matches!(err, UsersError::EmailTaken));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing() {
        let repo = InMemoryAccountRepository::new();
        let first = Account::new_social(Email::new("s@x.com").unwrap());
        let (created, was_created) = repo.get_or_create(&first).await.unwrap();
        assert!(was_created);

        let second = Account::new_social(Email::new("s@x.com").unwrap());
        let (found, was_created) = repo.get_or_create(&second).await.unwrap();
        assert!(!was_created);
        assert_eq!(found.account_id, created.account_id);
    }

    #[tokio::test]
    async fn test_updates() {
        let repo = InMemoryAccountRepository::new();
        let a = Account::new_social(Email::new("s@x.com").unwrap());
        repo.create(&a).await.unwrap();

        let raw = RawPassword::new("newpass99".into()).unwrap();
        let hashed = AccountPassword::from_raw(&raw, None).unwrap();
        repo.update_password(&a.account_id, &hashed).await.unwrap();
        let now = Utc::now();
        repo.record_login(&a.account_id, now).await.unwrap();

        let stored = repo.find_by_email(&a.email).await.unwrap().unwrap();
        assert!(stored.password.unwrap().verify(&raw, None));
        assert_eq!(stored.last_login, Some(now));

        assert!(repo.record_login(&AccountId::new(), now).await.is_err());
    }
}
