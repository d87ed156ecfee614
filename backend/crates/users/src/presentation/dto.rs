//! API DTOs (Data Transfer Objects)
//!
//! Request fields are all optional so that a missing field is reported by
//! validation as "This field is required." rather than as a parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{
    ChangePasswordInput, LogInInput, RequestPasswordResetInput, SignUpInput, SocialAuthInput,
    TokenPair,
};
use crate::domain::value_object::role::Role;

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl From<SignUpRequest> for SignUpInput {
    fn from(req: SignUpRequest) -> Self {
        SignUpInput {
            email: req.email,
            role: req.role,
            password: req.password,
            password_confirmation: req.password_confirmation,
        }
    }
}

/// Public projection of an account; password fields are never echoed
#[derive(Debug, Clone, Serialize)]
pub struct SignUpResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub date_joined: DateTime<Utc>,
}

// ============================================================================
// Log In
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<LogInRequest> for LogInInput {
    fn from(req: LogInRequest) -> Self {
        LogInInput {
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogInResponse {
    pub email: String,
    pub role: Role,
    pub tokens: TokenPair,
}

// ============================================================================
// Password Reset
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

impl From<PasswordResetRequest> for RequestPasswordResetInput {
    fn from(req: PasswordResetRequest) -> Self {
        RequestPasswordResetInput { email: req.email }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChangeRequest {
    pub email: Option<String>,
    pub token: Option<String>,
    pub new_password: Option<String>,
}

impl From<PasswordChangeRequest> for ChangePasswordInput {
    fn from(req: PasswordChangeRequest) -> Self {
        ChangePasswordInput {
            email: req.email,
            token: req.token,
            new_password: req.new_password,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

// ============================================================================
// Social
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialAuthRequest {
    pub provider: Option<String>,
    pub access_token: Option<String>,
}

impl From<SocialAuthRequest> for SocialAuthInput {
    fn from(req: SocialAuthRequest) -> Self {
        SocialAuthInput {
            provider: req.provider,
            access_token: req.access_token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialSignUpResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLogInResponse {
    pub id: String,
    pub email: String,
    pub token: TokenPair,
}
