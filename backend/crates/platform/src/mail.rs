//! Outbound Email
//!
//! [`Mailer`] is the delivery seam. [`SmtpMailer`] relays through an SMTP
//! server with STARTTLS via `lettre`; [`LogMailer`] writes the message to
//! the tracing log for local development.

use std::sync::Arc;
use std::time::Duration;

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// A plain-text message to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail delivery channel
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver the message; an error means it was not accepted for delivery
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

// ============================================================================
// SMTP
// ============================================================================

/// SMTP connection settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings, from: &str) -> Result<Self, MailError> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", from, e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(settings.port)
            .timeout(Some(settings.timeout));

        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: Arc::new(builder.build()),
            from,
        })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", mail.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        AsyncTransport::send(self.transport.as_ref(), message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::debug!(to = %mail.to, subject = %mail.subject, "Mail relayed");
        Ok(())
    }
}

// ============================================================================
// Log (development)
// ============================================================================

/// Writes messages to the log instead of sending them
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "Mail not sent (no SMTP relay configured)"
        );
        Ok(())
    }
}

// ============================================================================
// Runtime selection
// ============================================================================

/// Mailer chosen at startup from configuration
#[derive(Clone)]
pub enum MailTransport {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl Mailer for MailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        match self {
            MailTransport::Smtp(m) => Mailer::send(m, mail).await,
            MailTransport::Log(m) => Mailer::send(m, mail).await,
        }
    }
}
