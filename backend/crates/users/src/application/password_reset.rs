//! Password Reset Request Use Case
//!
//! Mails a reset token to the owner of a registered email. Unknown emails
//! are reported to the caller.

use kernel::validation::FieldErrors;
use platform::mail::{Mailer, OutgoingMail};
use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::application::parse_required;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::email::Email;
use crate::error::{UsersError, UsersResult};

pub const RESET_MAIL_SUBJECT: &str = "Password Reset";

#[derive(Debug, Default)]
pub struct RequestPasswordResetInput {
    pub email: Option<String>,
}

pub fn validate(input: RequestPasswordResetInput) -> Result<Email, FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = parse_required(&mut errors, "email", input.email, Email::new);
    match email {
        Some(email) => Ok(email),
        None => Err(errors),
    }
}

pub fn reset_mail_body(token: &str) -> String {
    format!(
        "Your password reset token is: {}\nUse this token to reset your password.",
        token
    )
}

pub struct RequestPasswordResetUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<UsersConfig>,
}

impl<R, M> RequestPasswordResetUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<UsersConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: RequestPasswordResetInput) -> UsersResult<()> {
        let email = validate(input)?;

        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(UsersError::UnknownEmail)?;

        let token = self.config.reset_tokens().make_token(&account);

        let mail = OutgoingMail {
            to: account.email.to_string(),
            subject: RESET_MAIL_SUBJECT.to_string(),
            body: reset_mail_body(&token),
        };
        self.mailer.send(&mail).await?;

        tracing::info!(account_id = %account.account_id, "Password reset token sent");

        Ok(())
    }
}
