//! Social Sign Up / Log In Use Case
//!
//! Exchanges a provider access token for the provider's profile, then
//! resolves the local account by email, creating it when unseen.

use kernel::validation::FieldErrors;
use std::sync::Arc;

use crate::application::parse_required;
use crate::application::tokens::{TokenIssuer, TokenPair};
use crate::domain::entity::account::Account;
use crate::domain::identity::ProfileFetcher;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId, email::Email, role::Role, social_provider::SocialProvider,
};
use crate::error::{UsersError, UsersResult};

#[derive(Debug, Default)]
pub struct SocialAuthInput {
    pub provider: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug)]
pub struct ValidSocialAuth {
    pub provider: SocialProvider,
    pub access_token: String,
}

#[derive(Debug)]
pub struct SocialSignUpOutput {
    pub account_id: AccountId,
    pub email: Email,
    pub role: Role,
    pub created: bool,
}

#[derive(Debug)]
pub struct SocialLogInOutput {
    pub account_id: AccountId,
    pub email: Email,
    pub tokens: TokenPair,
}

pub fn validate(input: SocialAuthInput) -> Result<ValidSocialAuth, FieldErrors> {
    let mut errors = FieldErrors::new();

    let provider = parse_required(&mut errors, "provider", input.provider, |p| {
        p.parse::<SocialProvider>()
    });
    let access_token = errors.require("access_token", input.access_token);

    match (provider, access_token) {
        (Some(provider), Some(access_token)) => Ok(ValidSocialAuth {
            provider,
            access_token,
        }),
        _ => Err(errors),
    }
}

pub struct SocialAuthUseCase<R, P>
where
    R: AccountRepository,
    P: ProfileFetcher,
{
    repo: Arc<R>,
    profiles: Arc<P>,
    tokens: Arc<TokenIssuer>,
}

impl<R, P> SocialAuthUseCase<R, P>
where
    R: AccountRepository,
    P: ProfileFetcher,
{
    pub fn new(repo: Arc<R>, profiles: Arc<P>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            repo,
            profiles,
            tokens,
        }
    }

    pub async fn sign_up(&self, input: SocialAuthInput) -> UsersResult<SocialSignUpOutput> {
        let (account, created) = self.resolve(input).await?;
        Ok(SocialSignUpOutput {
            account_id: account.account_id,
            email: account.email,
            role: account.role,
            created,
        })
    }

    pub async fn log_in(&self, input: SocialAuthInput) -> UsersResult<SocialLogInOutput> {
        let (mut account, _) = self.resolve(input).await?;

        if !account.is_active {
            return Err(UsersError::AccountInactive);
        }

        account.record_login();
        if let Some(at) = account.last_login {
            self.repo.record_login(&account.account_id, at).await?;
        }

        let tokens = self.tokens.issue(&account)?;

        tracing::info!(account_id = %account.account_id, "Account logged in via social provider");

        Ok(SocialLogInOutput {
            account_id: account.account_id,
            email: account.email,
            tokens,
        })
    }

    async fn resolve(&self, input: SocialAuthInput) -> UsersResult<(Account, bool)> {
        // The provider is checked before any outbound call is made
        let request = validate(input)?;

        let profile = self
            .profiles
            .fetch_profile(request.provider, &request.access_token)
            .await?;

        let email = Email::new(profile.email)
            .map_err(|_| UsersError::social("provider returned an invalid email"))?;

        let (account, created) = self.repo.get_or_create(&Account::new_social(email)).await?;

        if created {
            tracing::info!(
                account_id = %account.account_id,
                provider = %request.provider,
                "Account created via social provider"
            );
        }

        Ok((account, created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::validation::REQUIRED;

    #[test]
    fn test_validate_unknown_provider() {
        let errors = validate(SocialAuthInput {
            provider: Some("myspace".into()),
            access_token: Some("tok".into()),
        })
        .unwrap_err();
        assert_eq!(
            errors.get("provider").unwrap(),
            ["\"myspace\" is not a valid choice."]
        );
    }

    #[test]
    fn test_validate_missing_fields() {
        let errors = validate(SocialAuthInput::default()).unwrap_err();
        assert_eq!(errors.get("provider").unwrap(), [REQUIRED]);
        assert_eq!(errors.get("access_token").unwrap(), [REQUIRED]);
    }

    #[test]
    fn test_validate_ok() {
        let request = validate(SocialAuthInput {
            provider: Some("facebook".into()),
            access_token: Some("tok".into()),
        })
        .unwrap();
        assert_eq!(request.provider, SocialProvider::Facebook);
        assert_eq!(request.access_token, "tok");
    }
}
