//! Account Entity
//!
//! The single persistent identity record. Accounts are never deleted; the
//! password hash and `last_login` are the only fields that change after
//! creation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::value_object::{
    account_id::AccountId, account_password::AccountPassword, email::Email, role::Role,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Superuser must have role as Admin.")]
pub struct SuperuserRoleError;

#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub email: Email,
    pub role: Role,
    /// `None` for accounts without a usable password (social signups)
    pub password: Option<AccountPassword>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl Account {
    /// Regular account created through password signup
    pub fn new(email: Email, role: Role, password: AccountPassword) -> Self {
        Self {
            password: Some(password),
            ..Self::base(email, role)
        }
    }

    /// Account created by the social bridge: default role, no password
    pub fn new_social(email: Email) -> Self {
        Self::base(email, Role::default())
    }

    /// Staff account with every permission; only admins qualify
    pub fn new_superuser(
        email: Email,
        role: Role,
        password: AccountPassword,
    ) -> Result<Self, SuperuserRoleError> {
        if !role.is_admin() {
            return Err(SuperuserRoleError);
        }
        Ok(Self {
            is_staff: true,
            is_superuser: true,
            ..Self::new(email, role, password)
        })
    }

    fn base(email: Email, role: Role) -> Self {
        Self {
            account_id: AccountId::new(),
            email,
            role,
            password: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            date_joined: Utc::now(),
        }
    }

    pub fn has_usable_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn set_password(&mut self, password: AccountPassword) {
        self.password = Some(password);
    }

    pub fn record_login(&mut self) {
        self.last_login = Some(Utc::now());
    }
}
