//! Users Error Types
//!
//! Every client-side failure renders as 400 with an `errors` map keyed by
//! field name (or `non_field_errors`). Store, hashing, signing and mail
//! failures render as a bare 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use platform::jwt::JwtError;
use platform::mail::MailError;
use platform::password::PasswordHashError;
use thiserror::Error;

pub type UsersResult<T> = Result<T, UsersError>;

#[derive(Debug, Error)]
pub enum UsersError {
    /// Missing or malformed request fields
    #[error("{0}")]
    Validation(FieldErrors),

    #[error("account with this email already exists.")]
    EmailTaken,

    /// Unknown email, missing usable password or wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("This account is inactive.")]
    AccountInactive,

    /// Password reset requested for an email with no account
    #[error("No user is associated with this email.")]
    UnknownEmail,

    #[error("Invalid token.")]
    InvalidResetToken,

    /// Provider exchange failed; `reason` is logged, never returned
    #[error("Unable to authenticate with the social provider.")]
    SocialAuthFailed { reason: String },

    #[error("JSON parse error - {0}")]
    MalformedBody(String),

    #[error("Mail delivery failed: {0}")]
    Mail(#[from] MailError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UsersError {
    pub fn social(reason: impl Into<String>) -> Self {
        UsersError::SocialAuthFailed {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UsersError::Mail(_) | UsersError::Database(_) | UsersError::Internal(_) => {
                ErrorKind::InternalServerError
            }
            _ => ErrorKind::BadRequest,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Field-level detail for client errors
    pub fn field_errors(&self) -> Option<FieldErrors> {
        let errors = match self {
            UsersError::Validation(errors) => errors.clone(),
            UsersError::EmailTaken | UsersError::UnknownEmail => {
                FieldErrors::single("email", self.to_string())
            }
            UsersError::InvalidCredentials
            | UsersError::AccountInactive
            | UsersError::InvalidResetToken
            | UsersError::SocialAuthFailed { .. }
            | UsersError::MalformedBody(_) => FieldErrors::non_field(self.to_string()),
            UsersError::Mail(_) | UsersError::Database(_) | UsersError::Internal(_) => {
                return None;
            }
        };
        Some(errors)
    }

    pub fn to_app_error(&self) -> AppError {
        match self.field_errors() {
            Some(errors) if matches!(self, UsersError::Validation(_)) => {
                AppError::validation(errors)
            }
            Some(errors) => {
                AppError::new(self.kind(), self.to_string()).with_field_errors(errors)
            }
            None => AppError::internal("Internal server error"),
        }
    }

    fn log(&self) {
        match self {
            UsersError::Database(e) => {
                tracing::error!(error = %e, "Users database error");
            }
            UsersError::Mail(e) => {
                tracing::error!(error = %e, "Users mail delivery error");
            }
            UsersError::Internal(msg) => {
                tracing::error!(message = %msg, "Users internal error");
            }
            UsersError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            UsersError::AccountInactive => {
                tracing::warn!("Login attempt on inactive account");
            }
            UsersError::InvalidResetToken => {
                tracing::warn!("Password change with invalid reset token");
            }
            UsersError::SocialAuthFailed { reason } => {
                tracing::warn!(reason = %reason, "Social provider exchange failed");
            }
            _ => {
                tracing::debug!(error = %self, "Users error");
            }
        }
    }
}

impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<FieldErrors> for UsersError {
    fn from(errors: FieldErrors) -> Self {
        UsersError::Validation(errors)
    }
}

impl From<PasswordHashError> for UsersError {
    fn from(err: PasswordHashError) -> Self {
        UsersError::Internal(err.to_string())
    }
}

impl From<JwtError> for UsersError {
    fn from(err: JwtError) -> Self {
        UsersError::Internal(err.to_string())
    }
}
