use hermod_core::{Email, SendOutcome};
use hermod_provider::{Pacing, Provider};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info, instrument};

use crate::config::SmtpConfig;
use crate::error::SmtpError;

/// SMTP provider that delivers mail through a relay using `lettre`.
///
/// Plain SMTP assigns no vendor message id, so accepted mail comes back as
/// a success without one.
pub struct SmtpProvider {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    pacing: Pacing,
}

impl std::fmt::Debug for SmtpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpProvider")
            .field("config", &self.config)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl SmtpProvider {
    /// Create a new SMTP provider from the given configuration.
    ///
    /// Fails when the relay transport cannot be built, e.g. an invalid TLS
    /// host name.
    pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
        let transport = build_transport(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create an SMTP provider with a pre-built transport (for testing).
    pub fn with_transport(
        config: SmtpConfig,
        transport: AsyncSmtpTransport<Tokio1Executor>,
    ) -> Self {
        Self {
            config,
            transport,
            pacing: Pacing::default(),
        }
    }

    /// Override the bulk dispatch pacing (zero in tests).
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}

impl Provider for SmtpProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "smtp"
    }

    #[instrument(skip(self, email), fields(provider = "smtp", subject = %email.subject))]
    async fn send(&self, email: &Email) -> SendOutcome {
        let from = email.from.as_deref().unwrap_or(&self.config.default_from);

        debug!(to = ?email.to, "building SMTP message");
        let message = match build_message(email, from) {
            Ok(message) => message,
            Err(e) => return SendOutcome::failed(e.to_string()),
        };

        info!(to = ?email.to, "sending email via SMTP");
        match self.transport.send(message).await {
            Ok(_) => SendOutcome::sent_without_id(),
            Err(e) => {
                error!(error = %e, "SMTP send failed");
                SendOutcome::failed(describe_smtp_error(&e))
            }
        }
    }

    fn pacing(&self) -> Pacing {
        self.pacing
    }

    #[instrument(skip(self), fields(provider = "smtp"))]
    async fn verify(&self) -> bool {
        debug!("performing SMTP connection test");
        self.transport.test_connection().await.unwrap_or(false)
    }
}

/// Build a `lettre::Message` from an [`Email`] and a resolved sender.
///
/// Tags have no SMTP representation and are dropped.
fn build_message(email: &Email, from: &str) -> Result<Message, SmtpError> {
    let from_mailbox: Mailbox = from
        .parse()
        .map_err(|e| SmtpError::Address("from", format!("{e}")))?;

    let mut builder = Message::builder().from(from_mailbox);

    for to in &email.to {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| SmtpError::Address("recipient", format!("{e}")))?;
        builder = builder.to(to_mailbox);
    }

    if let Some(ref reply_to) = email.reply_to {
        let reply_mailbox: Mailbox = reply_to
            .parse()
            .map_err(|e| SmtpError::Address("reply-to", format!("{e}")))?;
        builder = builder.reply_to(reply_mailbox);
    }

    let builder = builder.subject(&email.subject);

    let message = match (&email.text, &email.html) {
        (Some(text), Some(html)) => builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(lettre::message::header::ContentType::TEXT_PLAIN)
                            .body(text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(lettre::message::header::ContentType::TEXT_HTML)
                            .body(html.clone()),
                    ),
            )
            .map_err(|e| SmtpError::Build(e.to_string()))?,
        (Some(text), None) => builder
            .body(text.clone())
            .map_err(|e| SmtpError::Build(e.to_string()))?,
        (None, Some(html)) => builder
            .singlepart(
                SinglePart::builder()
                    .header(lettre::message::header::ContentType::TEXT_HTML)
                    .body(html.clone()),
            )
            .map_err(|e| SmtpError::Build(e.to_string()))?,
        (None, None) => builder
            .body(String::new())
            .map_err(|e| SmtpError::Build(e.to_string()))?,
    };

    Ok(message)
}

/// Build an async SMTP transport from the given configuration.
fn build_transport(config: &SmtpConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, SmtpError> {
    let builder = if config.tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| SmtpError::Relay(e.to_string()))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
    };

    let builder = builder.port(config.port);

    let builder = if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        builder.credentials(Credentials::new(user.clone(), pass.clone()))
    } else {
        builder
    };

    Ok(builder.build())
}

/// Describe a lettre SMTP error for the failed outcome.
fn describe_smtp_error(error: &lettre::transport::smtp::Error) -> String {
    if error.is_transient() {
        format!("transient SMTP error: {error}")
    } else if error.is_permanent() {
        format!("permanent SMTP error: {error}")
    } else {
        format!("SMTP error: {error}")
    }
}
