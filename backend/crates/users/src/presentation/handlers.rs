//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use platform::mail::Mailer;
use std::sync::Arc;

use crate::application::{
    ChangePasswordUseCase, LogInUseCase, RequestPasswordResetUseCase,
    SignUpUseCase, SocialAuthUseCase, TokenIssuer, UsersConfig,
};
use crate::domain::identity::ProfileFetcher;
use crate::domain::repository::AccountRepository;
use crate::error::{UsersError, UsersResult};
use crate::presentation::dto::{
    DetailResponse, LogInRequest, LogInResponse, PasswordChangeRequest, PasswordResetRequest,
    SignUpRequest, SignUpResponse, SocialAuthRequest, SocialLogInResponse, SocialSignUpResponse,
};

pub const RESET_LINK_SENT: &str = "Password reset link sent.";
pub const PASSWORD_RESET_DONE: &str = "Password has been reset successfully.";

/// Shared state for users handlers
#[derive(Clone)]
pub struct UsersAppState<R, P, M>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub profiles: Arc<P>,
    pub mailer: Arc<M>,
    pub config: Arc<UsersConfig>,
    pub tokens: Arc<TokenIssuer>,
}

impl<R, P, M> UsersAppState<R, P, M>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, profiles: P, mailer: M, config: UsersConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            profiles: Arc::new(profiles),
            mailer: Arc::new(mailer),
            tokens: Arc::new(config.token_issuer()),
            config: Arc::new(config),
        }
    }
}

/// Unwrap a JSON body, turning a parse failure into a 400 with field detail
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> UsersResult<T> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| UsersError::MalformedBody(rejection.body_text()))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/users/signup
pub async fn sign_up<R, P, M>(
    State(state): State<UsersAppState<R, P, M>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> UsersResult<(StatusCode, Json<SignUpResponse>)>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            id: output.account_id.to_string(),
            email: output.email.into_db(),
            role: output.role,
            date_joined: output.date_joined,
        }),
    ))
}

// ============================================================================
// Log In
// ============================================================================

/// POST /api/users/login
pub async fn log_in<R, P, M>(
    State(state): State<UsersAppState<R, P, M>>,
    payload: Result<Json<LogInRequest>, JsonRejection>,
) -> UsersResult<Json<LogInResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = LogInUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );
    let output = use_case.execute(req.into()).await?;

    Ok(Json(LogInResponse {
        email: output.email.into_db(),
        role: output.role,
        tokens: output.tokens,
    }))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/users/password-reset
pub async fn request_password_reset<R, P, M>(
    State(state): State<UsersAppState<R, P, M>>,
    payload: Result<Json<PasswordResetRequest>, JsonRejection>,
) -> UsersResult<Json<DetailResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = RequestPasswordResetUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );
    use_case.execute(req.into()).await?;

    Ok(Json(DetailResponse {
        detail: RESET_LINK_SENT,
    }))
}

/// POST|PUT /api/users/password-change
pub async fn change_password<R, P, M>(
    State(state): State<UsersAppState<R, P, M>>,
    payload: Result<Json<PasswordChangeRequest>, JsonRejection>,
) -> UsersResult<Json<DetailResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(req.into()).await?;

    Ok(Json(DetailResponse {
        detail: PASSWORD_RESET_DONE,
    }))
}

// ============================================================================
// Social
// ============================================================================

/// POST /api/users/social-signup
pub async fn social_sign_up<R, P, M>(
    State(state): State<UsersAppState<R, P, M>>,
    payload: Result<Json<SocialAuthRequest>, JsonRejection>,
) -> UsersResult<(StatusCode, Json<SocialSignUpResponse>)>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = SocialAuthUseCase::new(
        state.repo.clone(),
        state.profiles.clone(),
        state.tokens.clone(),
    );
    let output = use_case.sign_up(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SocialSignUpResponse {
            id: output.account_id.to_string(),
            email: output.email.into_db(),
            role: output.role,
        }),
    ))
}

/// POST /api/users/social-login
pub async fn social_log_in<R, P, M>(
    State(state): State<UsersAppState<R, P, M>>,
    payload: Result<Json<SocialAuthRequest>, JsonRejection>,
) -> UsersResult<Json<SocialLogInResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = SocialAuthUseCase::new(
        state.repo.clone(),
        state.profiles.clone(),
        state.tokens.clone(),
    );
    let output = use_case.log_in(req.into()).await?;

    Ok(Json(SocialLogInResponse {
        id: output.account_id.to_string(),
        email: output.email.into_db(),
        token: output.tokens,
    }))
}
