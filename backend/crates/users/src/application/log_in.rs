//! Log In Use Case
//!
//! Checks an email/password pair and issues a token pair for the account.

use kernel::validation::FieldErrors;
use std::sync::{Arc, OnceLock};

use crate::application::config::UsersConfig;
use crate::application::tokens::{TokenIssuer, TokenPair};
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    email::Email,
    role::Role,
};
use crate::error::{UsersError, UsersResult};

pub const CREDENTIALS_REQUIRED: &str = "Both email and password are required.";

/// Verified in place of a missing stored hash, so an unknown email costs
/// the same Argon2 run as a wrong password
fn dummy_password() -> Option<&'static AccountPassword> {
    static DUMMY: OnceLock<Option<AccountPassword>> = OnceLock::new();
    DUMMY
        .get_or_init(|| {
            let raw = RawPassword::new("no account has this password".to_string()).ok()?;
            AccountPassword::from_raw(&raw, None).ok()
        })
        .as_ref()
}

/// Log in input, as submitted
#[derive(Debug, Default)]
pub struct LogInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Log in output
#[derive(Debug)]
pub struct LogInOutput {
    pub email: Email,
    pub role: Role,
    pub tokens: TokenPair,
}

/// Validated credentials
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    /// `None` when the submitted password cannot be a stored one
    pub password: Option<RawPassword>,
}

pub fn validate(input: LogInInput) -> Result<Credentials, FieldErrors> {
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(email), Some(password)) = (non_blank(input.email), non_blank(input.password)) else {
        return Err(FieldErrors::non_field(CREDENTIALS_REQUIRED));
    };
    let email = Email::new(email).map_err(|e| FieldErrors::single("email", e.to_string()))?;

    Ok(Credentials {
        email,
        password: RawPassword::new(password).ok(),
    })
}

/// Log in use case
pub struct LogInUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
    tokens: Arc<TokenIssuer>,
}

impl<R> LogInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, input: LogInInput) -> UsersResult<LogInOutput> {
        let credentials = validate(input)?;
        let mut account = self.authenticate(credentials).await?;

        // Inactive accounts are only reported once the password matched
        if !account.is_active {
            return Err(UsersError::AccountInactive);
        }

        account.record_login();
        if let Some(at) = account.last_login {
            self.repo.record_login(&account.account_id, at).await?;
        }

        let tokens = self.tokens.issue(&account)?;

        tracing::info!(account_id = %account.account_id, "Account logged in");

        Ok(LogInOutput {
            email: account.email,
            role: account.role,
            tokens,
        })
    }

    /// Same error whether the email, the stored password or the match failed
    async fn authenticate(&self, credentials: Credentials) -> UsersResult<Account> {
        let account = self.repo.find_by_email(&credentials.email).await?;
        let Some(submitted) = &credentials.password else {
            return Err(UsersError::InvalidCredentials);
        };
        let pepper = self.config.pepper();

        match account {
            Some(account) if account.has_usable_password() => {
                let verified = account
                    .password
                    .as_ref()
                    .is_some_and(|stored| stored.verify(submitted, pepper));
                if verified {
                    return Ok(account);
                }
            }
            _ => {
                if let Some(dummy) = dummy_password() {
                    dummy.verify(submitted, pepper);
                }
            }
        }

        Err(UsersError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::validation::NON_FIELD_ERRORS;

    fn input(email: Option<&str>, password: Option<&str>) -> LogInInput {
        LogInInput {
            email: email.map(String::from),
            password: password.map(String::from),
        }
    }

    #[test]
    fn test_validate_requires_both() {
        for case in [
            input(None, None),
            input(Some("a@x.com"), None),
            input(None, Some("secret123")),
            input(Some(""), Some("secret123")),
            input(Some("a@x.com"), Some("   ")),
        ] {
            let errors = validate(case).unwrap_err();
            assert_eq!(errors.get(NON_FIELD_ERRORS).unwrap(), [CREDENTIALS_REQUIRED]);
        }
    }

    #[test]
    fn test_validate_malformed_email() {
        let errors = validate(input(Some("not-an-email"), Some("secret123"))).unwrap_err();
        assert_eq!(errors.get("email").unwrap(), ["Enter a valid email address."]);
    }

    #[test]
    fn test_dummy_password_costs_like_a_real_hash() {
        let dummy = dummy_password().unwrap();
        let real = AccountPassword::from_raw(&RawPassword::new("secret123".into()).unwrap(), None)
            .unwrap();

        let params = |hash: &str| hash.rsplitn(3, '$').nth(2).map(String::from);
        assert_eq!(params(dummy.as_str()), params(real.as_str()));
        assert!(!dummy.verify(&RawPassword::new("secret123".into()).unwrap(), None));
    }

    #[tokio::test]
    async fn test_unknown_and_passwordless_accounts_fail_alike() {
        use crate::infra::memory::InMemoryAccountRepository;

        let repo = InMemoryAccountRepository::new();
        repo.create(&Account::new_social(Email::new("s@x.com").unwrap()))
            .await
            .unwrap();

        let config = Arc::new(UsersConfig::with_random_secrets());
        let use_case = LogInUseCase::new(
            Arc::new(repo),
            config.clone(),
            Arc::new(config.token_issuer()),
        );

        for email in ["ghost@x.com", "s@x.com"] {
            let err = use_case
                .execute(input(Some(email), Some("secret123")))
                .await
                .unwrap_err();
            assert!(matches!(err, UsersError::InvalidCredentials), "{email}");
        }
    }

    #[test]
    fn test_validate_ok() {
        let credentials = validate(input(Some("A@x.com"), Some("secret123"))).unwrap();
        assert_eq!(credentials.email.as_str(), "a@x.com");
        assert!(credentials.password.is_some());
    }
}
