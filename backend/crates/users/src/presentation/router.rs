//! Users Router

use axum::{Router, routing::post};
use platform::mail::Mailer;

use crate::application::config::UsersConfig;
use crate::domain::identity::ProfileFetcher;
use crate::domain::repository::AccountRepository;
use crate::presentation::handlers::{self, UsersAppState};

/// Create the users router for any store, provider client and mailer
pub fn users_router<R, P, M>(repo: R, profiles: P, mailer: M, config: UsersConfig) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    P: ProfileFetcher + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<R, P, M>))
        .route("/login", post(handlers::log_in::<R, P, M>))
        .route(
            "/password-reset",
            post(handlers::request_password_reset::<R, P, M>),
        )
        .route(
            "/password-change",
            post(handlers::change_password::<R, P, M>).put(handlers::change_password::<R, P, M>),
        )
        .route("/social-signup", post(handlers::social_sign_up::<R, P, M>))
        .route("/social-login", post(handlers::social_log_in::<R, P, M>))
        .with_state(UsersAppState::new(repo, profiles, mailer, config))
}
