//! API Server Entry Point
//!
//! Application entry point, server initialization and operator commands.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! users crate.

mod cli;

use anyhow::Context;
use axum::extract::Request;
use axum::{
    Router, ServiceExt, http,
    http::{Method, header},
};
use clap::Parser;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use users::application::{CreateSuperuserInput, CreateSuperuserUseCase};
use users::{HttpProfileFetcher, InMemoryAccountRepository, PgAccountRepository, users_router};

use crate::cli::{Cli, Commands, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,users=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind_addr,
            frontend_origins,
            in_memory,
        } => serve(&cli.settings, bind_addr, &frontend_origins, in_memory).await,
        Commands::CreateSuperuser {
            email,
            password,
            role,
        } => create_superuser(&cli.settings, email, password, role).await,
    }
}

async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let database_url = settings
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    Ok(pool)
}

async fn serve(
    settings: &Settings,
    addr: SocketAddr,
    frontend_origins: &str,
    in_memory: bool,
) -> anyhow::Result<()> {
    let config = settings.users_config()?;
    let mailer = settings.mailer()?;
    let profiles = HttpProfileFetcher::new()?;

    let users = if in_memory {
        tracing::warn!("Using in-memory account store, accounts are lost on restart");
        users_router(InMemoryAccountRepository::new(), profiles, mailer, config)
    } else {
        let pool = connect(settings).await?;
        users_router(PgAccountRepository::new(pool), profiles, mailer, config)
    };

    let app = app(users, frontend_origins);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}

/// Mount the users routes under `/api/users` with tracing, CORS and
/// trailing-slash normalization
fn app(users: Router, frontend_origins: &str) -> NormalizePath<Router> {
    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .nest("/api/users", users)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // `/api/users/login/` and `/api/users/login` reach the same handler
    NormalizePathLayer::trim_trailing_slash().layer(app)
}

async fn create_superuser(
    settings: &Settings,
    email: String,
    password: String,
    role: Option<String>,
) -> anyhow::Result<()> {
    let config = settings.users_config()?;
    let pool = connect(settings).await?;

    let use_case = CreateSuperuserUseCase::new(
        Arc::new(PgAccountRepository::new(pool)),
        Arc::new(config),
    );

    let account_id = use_case
        .execute(CreateSuperuserInput {
            email: Some(email),
            password: Some(password),
            role,
        })
        .await?;

    tracing::info!(account_id = %account_id, "Superuser created successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use platform::mail::{LogMailer, MailTransport};
    use tower::ServiceExt as _;
    use users::UsersConfig;

    fn test_app() -> NormalizePath<Router> {
        let users = users_router(
            InMemoryAccountRepository::new(),
            HttpProfileFetcher::new().unwrap(),
            MailTransport::Log(LogMailer),
            UsersConfig::with_random_secrets(),
        );
        app(users, "http://localhost:3000")
    }

    async fn post(uri: &str, body: &'static str) -> StatusCode {
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_trailing_slash_reaches_handler() {
        let signup = r#"{"email":"a@x.com","role":"agent","password":"secret123","password_confirmation":"secret123"}"#;
        assert_eq!(post("/api/users/signup/", signup).await, StatusCode::CREATED);
        assert_eq!(post("/api/users/signup", signup).await, StatusCode::CREATED);
        assert_eq!(post("/api/users/login/", "{}").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        assert_eq!(post("/api/users/logout/", "{}").await, StatusCode::NOT_FOUND);
    }
}
