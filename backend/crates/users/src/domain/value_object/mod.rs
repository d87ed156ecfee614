//! Value Object Module

pub mod account_id;
pub mod account_password;
pub mod email;
pub mod role;
pub mod social_provider;

use thiserror::Error;

/// Value outside a closed set of codes, carrying the value as submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a valid choice.")]
pub struct InvalidChoice(pub String);
