//! Application Layer
//!
//! Use cases and application services. Each use case takes its input as
//! received (every field optional), validates it into typed values with a
//! pure function, then talks to the store, mailer or provider.

pub mod config;
pub mod create_superuser;
pub mod log_in;
pub mod password_change;
pub mod password_reset;
pub mod sign_up;
pub mod social_auth;
pub mod tokens;

use kernel::validation::FieldErrors;
use std::fmt::Display;

// Re-exports
pub use config::UsersConfig;
pub use create_superuser::{CreateSuperuserInput, CreateSuperuserUseCase};
pub use log_in::{LogInInput, LogInOutput, LogInUseCase};
pub use password_change::{ChangePasswordInput, ChangePasswordUseCase};
pub use password_reset::{RequestPasswordResetInput, RequestPasswordResetUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use social_auth::{SocialAuthInput, SocialLogInOutput, SocialSignUpOutput, SocialAuthUseCase};
pub use tokens::{AccountClaims, TokenIssuer, TokenPair, TokenType};

/// Require `value` on `field` and parse it, recording either failure
pub(crate) fn parse_required<T, E: Display>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, E>,
) -> Option<T> {
    let value = errors.require(field, value)?;
    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.add(field, e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::validation::REQUIRED;

    fn parse_even(s: String) -> Result<u32, String> {
        match s.parse::<u32>() {
            Ok(n) if n % 2 == 0 => Ok(n),
            _ => Err(format!("{} is not even", s)),
        }
    }

    #[test]
    fn test_parse_required() {
        let mut errors = FieldErrors::new();
        assert_eq!(parse_required(&mut errors, "n", Some("4".into()), parse_even), Some(4));
        assert!(errors.is_empty());

        assert_eq!(parse_required(&mut errors, "a", None, parse_even), None);
        assert_eq!(parse_required(&mut errors, "b", Some("  ".into()), parse_even), None);
        assert_eq!(parse_required(&mut errors, "c", Some("3".into()), parse_even), None);

        assert_eq!(errors.get("a").unwrap(), [REQUIRED]);
        assert_eq!(errors.get("b").unwrap(), [REQUIRED]);
        assert_eq!(errors.get("c").unwrap(), ["3 is not even"]);
    }
}
