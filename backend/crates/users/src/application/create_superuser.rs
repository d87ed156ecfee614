//! Create Superuser Use Case
//!
//! Operator command for bootstrapping an administrative account.

use kernel::validation::FieldErrors;
use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::application::parse_required;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId,
    account_password::{AccountPassword, RawPassword},
    email::Email,
    role::Role,
};
use crate::error::{UsersError, UsersResult};

#[derive(Debug, Default)]
pub struct CreateSuperuserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to `admin`
    pub role: Option<String>,
}

pub struct CreateSuperuserUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> CreateSuperuserUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: CreateSuperuserInput) -> UsersResult<AccountId> {
        let mut errors = FieldErrors::new();
        let email = parse_required(&mut errors, "email", input.email, Email::new);
        let password = parse_required(&mut errors, "password", input.password, RawPassword::new);
        let role = match input.role {
            Some(code) => Role::from_code(&code)
                .map_err(|e| errors.add("role", e.to_string()))
                .ok(),
            None => Some(Role::Admin),
        };

        let (Some(email), Some(password), Some(role)) = (email, password, role) else {
            return Err(UsersError::Validation(errors));
        };

        let hashed = AccountPassword::from_raw(&password, self.config.pepper())?;
        let account = Account::new_superuser(email, role, hashed)
            .map_err(|e| UsersError::Validation(FieldErrors::single("role", e.to_string())))?;

        self.repo.create(&account).await?;

        tracing::info!(account_id = %account.account_id, "Superuser created");

        Ok(account.account_id)
    }
}
