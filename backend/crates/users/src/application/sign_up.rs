//! Sign Up Use Case
//!
//! Creates a new account from email, role and a confirmed password.

use chrono::{DateTime, Utc};
use kernel::validation::{FieldErrors, NON_FIELD_ERRORS};
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

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";

/// Sign up input, as submitted
#[derive(Debug, Default)]
pub struct SignUpInput {
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Validated sign up request
#[derive(Debug)]
pub struct ValidSignUp {
    pub email: Email,
    pub role: Role,
    pub password: RawPassword,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub account_id: AccountId,
    pub email: Email,
    pub role: Role,
    pub date_joined: DateTime<Utc>,
}

/// Collect every field problem, then check that the passwords agree
pub fn validate(input: SignUpInput) -> Result<ValidSignUp, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = parse_required(&mut errors, "email", input.email, Email::new);
    let role = parse_required(&mut errors, "role", input.role, |r| Role::from_code(&r));
    let password = parse_required(&mut errors, "password", input.password, RawPassword::new);
    let confirmation = errors.require("password_confirmation", input.password_confirmation);

    if let (Some(password), Some(confirmation)) = (&password, confirmation) {
        let same = RawPassword::new(confirmation)
            .map(|c| password.matches(&c))
            .unwrap_or(false);
        if !same {
            errors.add(NON_FIELD_ERRORS, PASSWORDS_DO_NOT_MATCH);
        }
    }

    match (email, role, password) {
        (Some(email), Some(role), Some(password)) if errors.is_empty() => Ok(ValidSignUp {
            email,
            role,
            password,
        }),
        _ => Err(errors),
    }
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> UsersResult<SignUpOutput> {
        let request = validate(input)?;

        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(UsersError::EmailTaken);
        }

        let password = AccountPassword::from_raw(&request.password, self.config.pepper())?;
        let account = Account::new(request.email, request.role, password);

        // A concurrent signup that won the race surfaces here as EmailTaken
        self.repo.create(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            role = %account.role,
            "Account signed up"
        );

        Ok(SignUpOutput {
            account_id: account.account_id,
            email: account.email,
            role: account.role,
            date_joined: account.date_joined,
        })
    }
}
