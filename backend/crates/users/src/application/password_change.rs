//! Password Change Use Case
//!
//! Second phase of the reset flow: a mailed token authorizes replacing the
//! account's password.

use kernel::validation::FieldErrors;
use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::application::parse_required;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    email::Email,
};
use crate::error::{UsersError, UsersResult};

#[derive(Debug, Default)]
pub struct ChangePasswordInput {
    pub email: Option<String>,
    pub token: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug)]
pub struct ValidPasswordChange {
    pub email: Email,
    pub token: String,
    /// Raw value; strength is checked only after the token
    pub new_password: String,
}

pub fn validate(input: ChangePasswordInput) -> Result<ValidPasswordChange, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = parse_required(&mut errors, "email", input.email, Email::new);
    let token = errors.require("token", input.token);
    let new_password = errors.require("new_password", input.new_password);

    match (email, token, new_password) {
        (Some(email), Some(token), Some(new_password)) => Ok(ValidPasswordChange {
            email,
            token,
            new_password,
        }),
        _ => Err(errors),
    }
}

pub struct ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> UsersResult<()> {
        let request = validate(input)?;

        let account = self
            .repo
            .find_by_email(&request.email)
            .await?
            .ok_or(UsersError::InvalidResetToken)?;

        if !self.config.reset_tokens().check_token(&account, &request.token) {
            return Err(UsersError::InvalidResetToken);
        }

        let new_password = RawPassword::new(request.new_password)
            .map_err(|e| UsersError::Validation(FieldErrors::non_field(e.to_string())))?;
        new_password
            .ensure_strength()
            .map_err(|e| UsersError::Validation(FieldErrors::non_field(e.to_string())))?;

        let hashed = AccountPassword::from_raw(&new_password, self.config.pepper())?;
        self.repo
            .update_password(&account.account_id, &hashed)
            .await?;

        tracing::info!(account_id = %account.account_id, "Password changed with reset token");

        Ok(())
    }
}
