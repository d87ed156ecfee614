//! Command line and environment configuration
//!
//! Every setting can come from a flag or from the environment (`.env` is
//! loaded first). Secrets fall back to random values in debug builds only.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use platform::crypto::from_base64;
use platform::mail::{LogMailer, MailTransport, SmtpMailer, SmtpSettings};
use std::net::SocketAddr;
use std::time::Duration;
use users::UsersConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Parser)]
#[command(name = "api")]
#[command(about = "Users identity API server and operator commands")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address, IP:PORT
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
        bind_addr: SocketAddr,

        /// Comma separated list of allowed CORS origins
        #[arg(
            long,
            env = "FRONTEND_ORIGINS",
            default_value = "http://localhost:3000,http://127.0.0.1:3000"
        )]
        frontend_origins: String,

        /// Keep accounts in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Create an account with staff and superuser flags
    CreateSuperuser {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Must be `admin` (the default)
        #[arg(long)]
        role: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct Settings {
    /// PostgreSQL connection string
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// HS256 secret for access/refresh tokens
    #[arg(long, global = true, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Base64 encoded 32 byte key for password reset tokens
    #[arg(long, global = true, env = "RESET_TOKEN_SECRET", hide_env_values = true)]
    pub reset_token_secret: Option<String>,

    #[arg(long, global = true, env = "PASSWORD_PEPPER", hide_env_values = true)]
    pub password_pepper: Option<String>,

    #[arg(long, global = true, env = "ACCESS_TOKEN_TTL_SECS", default_value_t = 300)]
    pub access_token_ttl_secs: u64,

    #[arg(long, global = true, env = "REFRESH_TOKEN_TTL_SECS", default_value_t = 86_400)]
    pub refresh_token_ttl_secs: u64,

    #[arg(long, global = true, env = "RESET_TOKEN_TTL_SECS", default_value_t = 259_200)]
    pub reset_token_ttl_secs: u64,

    /// Sender address for password reset mail
    #[arg(long, global = true, env = "MAIL_FROM", default_value = "from@example.com")]
    pub mail_from: String,

    /// SMTP relay; mail is written to the log when unset
    #[arg(long, global = true, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[arg(long, global = true, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    #[arg(long, global = true, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    #[arg(long, global = true, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,
}

impl Settings {
    pub fn users_config(&self) -> anyhow::Result<UsersConfig> {
        let base = if cfg!(debug_assertions) {
            UsersConfig::with_random_secrets()
        } else {
            UsersConfig::default()
        };

        let jwt_secret = match &self.jwt_secret {
            Some(secret) => secret.clone().into_bytes(),
            None if cfg!(debug_assertions) => base.jwt_secret.clone(),
            None => bail!("JWT_SECRET must be set in production"),
        };

        let reset_token_secret = match &self.reset_token_secret {
            Some(b64) => decode_secret(b64).context("RESET_TOKEN_SECRET")?,
            None if cfg!(debug_assertions) => base.reset_token_secret,
            None => bail!("RESET_TOKEN_SECRET must be set in production"),
        };

        Ok(UsersConfig {
            jwt_secret,
            reset_token_secret,
            access_token_ttl: Duration::from_secs(self.access_token_ttl_secs),
            refresh_token_ttl: Duration::from_secs(self.refresh_token_ttl_secs),
            reset_token_ttl: Duration::from_secs(self.reset_token_ttl_secs),
            password_pepper: self.password_pepper.clone().map(String::into_bytes),
        })
    }

    pub fn mailer(&self) -> anyhow::Result<MailTransport> {
        let Some(host) = &self.smtp_host else {
            tracing::warn!("SMTP_HOST not set, outgoing mail will only be logged");
            return Ok(MailTransport::Log(LogMailer));
        };

        let settings = SmtpSettings {
            host: host.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            timeout: SMTP_TIMEOUT,
        };
        Ok(MailTransport::Smtp(SmtpMailer::new(
            &settings,
            &self.mail_from,
        )?))
    }
}

fn decode_secret(b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = from_base64(b64).context("not valid base64")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("expected 32 bytes, got {}", b.len()))
}
