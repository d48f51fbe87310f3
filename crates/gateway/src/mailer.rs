use hermod_console::ConsoleProvider;
use hermod_core::{BulkReport, Email, SendOutcome};
use hermod_provider::DynProvider;
use hermod_resend::{ResendConfig, ResendProvider};
use hermod_sendgrid::{SendGridConfig, SendGridProvider};
use hermod_smtp::SmtpProvider;
use hermod_subscribers::{SubscriberError, SubscriberStore};
use tracing::{info, instrument, warn};

use crate::config::{MailerConfig, ProviderKind};

/// Tag applied to every message fanned out by
/// [`send_newsletter`](Mailer::send_newsletter).
pub const NEWSLETTER_TAG: &str = "newsletter";

/// Front door for outbound mail.
///
/// A `Mailer` owns one delivery provider, chosen from configuration at
/// construction time, and applies service-level defaults (sender and
/// Reply-To) before handing messages to it. Misconfiguration never prevents
/// construction: a selected provider whose credentials are missing degrades
/// to the console provider with a warning, so the application keeps running
/// and messages show up in the logs.
pub struct Mailer {
    provider: Box<dyn DynProvider>,
    config: MailerConfig,
}

impl Mailer {
    /// Build a mailer from process environment variables.
    ///
    /// See [`MailerConfig::from_env`] for the variables read.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(MailerConfig::from_env())
    }

    /// Build a mailer from resolved configuration.
    #[must_use]
    pub fn new(config: MailerConfig) -> Self {
        let provider = build_provider(&config);
        info!(provider = provider.name(), "mailer initialized");
        Self { provider, config }
    }

    /// Replace the active provider, keeping the configured defaults.
    ///
    /// This is the seam tests use to observe dispatched messages.
    #[must_use]
    pub fn with_provider(mut self, provider: Box<dyn DynProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Name of the provider actually in use, after any fallback.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Deliver a single message through the active provider.
    ///
    /// The configured sender and Reply-To are filled in when the message
    /// leaves them unset. The outcome is reported as data; this method never
    /// fails.
    #[instrument(skip(self, email), fields(provider = self.provider.name()))]
    pub async fn send(&self, email: Email) -> SendOutcome {
        let email = self.apply_defaults(email);
        let outcome = self.provider.send(&email).await;
        match &outcome {
            SendOutcome::Sent { message_id } => {
                info!(
                    to = ?email.to,
                    subject = %email.subject,
                    message_id = ?message_id,
                    "email dispatched"
                );
            }
            SendOutcome::Failed { error } => {
                warn!(
                    to = ?email.to,
                    subject = %email.subject,
                    error = %error,
                    "email dispatch failed"
                );
            }
        }
        outcome
    }

    /// Deliver a batch of messages sequentially through the active provider.
    ///
    /// Defaults are applied to each message. Pacing between sends is the
    /// provider's own; failures are recorded per message and never abort the
    /// batch.
    #[instrument(skip(self, emails), fields(provider = self.provider.name(), count = emails.len()))]
    pub async fn send_bulk(&self, emails: Vec<Email>) -> BulkReport {
        let emails: Vec<Email> = emails
            .into_iter()
            .map(|email| self.apply_defaults(email))
            .collect();
        let report = self.provider.send_bulk(&emails).await;
        info!(
            sent = report.sent,
            failed = report.failed,
            total = report.total,
            "bulk dispatch complete"
        );
        report
    }

    /// Fan a newsletter issue out to every eligible subscriber.
    ///
    /// Each eligible address receives its own message carrying the HTML
    /// body, the optional plain-text body, and the [`NEWSLETTER_TAG`] tag.
    /// When nobody is eligible the provider is not touched and an empty
    /// report comes back.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriberError`] when the subscriber store cannot be read.
    /// Delivery failures do not error; they are counted in the report.
    pub async fn send_newsletter(
        &self,
        subscribers: &dyn SubscriberStore,
        subject: &str,
        html: &str,
        text: Option<&str>,
    ) -> Result<BulkReport, SubscriberError> {
        let addresses = subscribers.eligible_addresses().await?;
        if addresses.is_empty() {
            info!(subject = %subject, "no eligible subscribers, skipping newsletter dispatch");
            return Ok(BulkReport::empty());
        }

        info!(
            recipients = addresses.len(),
            subject = %subject,
            "dispatching newsletter"
        );

        let emails: Vec<Email> = addresses
            .into_iter()
            .map(|address| {
                let email = Email::new(address, subject)
                    .with_html(html)
                    .with_tag(NEWSLETTER_TAG);
                match text {
                    Some(text) => email.with_text(text),
                    None => email,
                }
            })
            .collect();

        Ok(self.send_bulk(emails).await)
    }

    /// Check that the active provider is reachable and its credential
    /// accepted.
    pub async fn verify(&self) -> bool {
        self.provider.verify().await
    }

    fn apply_defaults(&self, mut email: Email) -> Email {
        if email.from.is_none() {
            email = email.with_from(self.config.default_from.clone());
        }
        if email.reply_to.is_none()
            && let Some(reply_to) = &self.config.default_reply_to
        {
            email = email.with_reply_to(reply_to.clone());
        }
        email
    }
}

/// Construct the provider the configuration selects.
///
/// A selected provider that cannot be built (missing credential, missing
/// relay settings, transport construction failure) falls back to the console
/// provider so startup never fails on mail configuration.
fn build_provider(config: &MailerConfig) -> Box<dyn DynProvider> {
    match config.provider {
        ProviderKind::Console => Box::new(ConsoleProvider::new()),
        ProviderKind::Resend => match &config.api_key {
            Some(key) => Box::new(ResendProvider::new(ResendConfig::new(
                key.clone(),
                config.default_from.clone(),
            ))),
            None => {
                warn!("RESEND_API_KEY not set, falling back to console provider");
                Box::new(ConsoleProvider::new())
            }
        },
        ProviderKind::SendGrid => match &config.api_key {
            Some(key) => Box::new(SendGridProvider::new(SendGridConfig::new(
                key.clone(),
                config.default_from.clone(),
            ))),
            None => {
                warn!("SENDGRID_API_KEY not set, falling back to console provider");
                Box::new(ConsoleProvider::new())
            }
        },
        ProviderKind::Postmark => {
            warn!("postmark provider is not implemented, falling back to console provider");
            Box::new(ConsoleProvider::new())
        }
        ProviderKind::Smtp => match &config.smtp {
            Some(smtp) => match SmtpProvider::new(smtp.clone()) {
                Ok(provider) => Box::new(provider),
                Err(e) => {
                    warn!(error = %e, "failed to build SMTP provider, falling back to console provider");
                    Box::new(ConsoleProvider::new())
                }
            },
            None => {
                warn!("SMTP_HOST not set, falling back to console provider");
                Box::new(ConsoleProvider::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use hermod_provider::{Pacing, Provider};
    use hermod_subscribers_memory::MemorySubscriberStore;

    use super::*;

    /// Records every message it is asked to send.
    struct RecordingProvider {
        sent: Arc<Mutex<Vec<Email>>>,
    }

    impl RecordingProvider {
        fn new() -> (Self, Arc<Mutex<Vec<Email>>>) {
            let sent = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    sent: Arc::clone(&sent),
                },
                sent,
            )
        }
    }

    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, email: &Email) -> SendOutcome {
            self.sent.lock().unwrap().push(email.clone());
            SendOutcome::sent_without_id()
        }

        fn pacing(&self) -> Pacing {
            Pacing::none()
        }

        async fn verify(&self) -> bool {
            true
        }
    }

    /// A store whose reads always fail.
    struct BrokenStore;

    #[async_trait]
    impl SubscriberStore for BrokenStore {
        async fn subscribe(&self, _address: &str) -> Result<(), SubscriberError> {
            Err(SubscriberError::Backend("down".to_string()))
        }

        async fn confirm(&self, _address: &str) -> Result<bool, SubscriberError> {
            Err(SubscriberError::Backend("down".to_string()))
        }

        async fn unsubscribe(&self, _address: &str) -> Result<bool, SubscriberError> {
            Err(SubscriberError::Backend("down".to_string()))
        }

        async fn eligible_addresses(&self) -> Result<Vec<String>, SubscriberError> {
            Err(SubscriberError::Backend("down".to_string()))
        }

        async fn active_count(&self) -> Result<u64, SubscriberError> {
            Err(SubscriberError::Backend("down".to_string()))
        }
    }

    fn config_from(vars: &[(&str, &str)]) -> MailerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        MailerConfig::from_env_with(|name| vars.get(name).cloned())
    }

    fn recording_mailer(config: MailerConfig) -> (Mailer, Arc<Mutex<Vec<Email>>>) {
        let (provider, sent) = RecordingProvider::new();
        let mailer = Mailer::new(config).with_provider(Box::new(provider));
        (mailer, sent)
    }

    #[tokio::test]
    async fn empty_environment_selects_console() {
        let mailer = Mailer::new(config_from(&[]));
        assert_eq!(mailer.provider_name(), "console");
        assert!(mailer.verify().await);
    }

    #[test]
    fn resend_without_key_falls_back_to_console() {
        let mailer = Mailer::new(config_from(&[("EMAIL_PROVIDER", "resend")]));
        assert_eq!(mailer.provider_name(), "console");
    }

    #[tokio::test]
    async fn fallback_console_still_delivers() {
        let mailer = Mailer::new(config_from(&[("EMAIL_PROVIDER", "resend")]));

        let outcome = mailer.send(Email::new("a@x.com", "Hi")).await;
        assert!(outcome.is_sent());
        assert!(outcome.message_id().is_some_and(|id| !id.is_empty()));
    }

    #[test]
    fn resend_with_key_is_selected() {
        let mailer = Mailer::new(config_from(&[
            ("EMAIL_PROVIDER", "resend"),
            ("RESEND_API_KEY", "re_123"),
        ]));
        assert_eq!(mailer.provider_name(), "resend");
    }

    #[test]
    fn sendgrid_without_key_falls_back_to_console() {
        let mailer = Mailer::new(config_from(&[("EMAIL_PROVIDER", "sendgrid")]));
        assert_eq!(mailer.provider_name(), "console");
    }

    #[test]
    fn sendgrid_with_key_is_selected() {
        let mailer = Mailer::new(config_from(&[
            ("EMAIL_PROVIDER", "sendgrid"),
            ("SENDGRID_API_KEY", "sg_123"),
        ]));
        assert_eq!(mailer.provider_name(), "sendgrid");
    }

    #[test]
    fn postmark_falls_back_even_with_key() {
        let mailer = Mailer::new(config_from(&[
            ("EMAIL_PROVIDER", "postmark"),
            ("POSTMARK_API_KEY", "pm_123"),
        ]));
        assert_eq!(mailer.provider_name(), "console");
    }

    #[test]
    fn smtp_without_host_falls_back_to_console() {
        let mailer = Mailer::new(config_from(&[("EMAIL_PROVIDER", "smtp")]));
        assert_eq!(mailer.provider_name(), "console");
    }

    #[tokio::test]
    async fn smtp_with_host_is_selected() {
        let mailer = Mailer::new(config_from(&[
            ("EMAIL_PROVIDER", "smtp"),
            ("SMTP_HOST", "mail.example.com"),
        ]));
        assert_eq!(mailer.provider_name(), "smtp");
    }

    #[test]
    fn unknown_selector_falls_back_to_console() {
        let mailer = Mailer::new(config_from(&[("EMAIL_PROVIDER", "pigeon")]));
        assert_eq!(mailer.provider_name(), "console");
    }

    #[tokio::test]
    async fn send_applies_configured_defaults() {
        let (mailer, sent) = recording_mailer(config_from(&[
            ("EMAIL_FROM", "news@example.com"),
            ("EMAIL_REPLY_TO", "replies@example.com"),
        ]));

        let outcome = mailer.send(Email::new("user@example.com", "Hello")).await;
        assert!(outcome.is_sent());

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from.as_deref(), Some("news@example.com"));
        assert_eq!(sent[0].reply_to.as_deref(), Some("replies@example.com"));
    }

    #[tokio::test]
    async fn send_keeps_explicit_sender() {
        let (mailer, sent) = recording_mailer(config_from(&[("EMAIL_FROM", "news@example.com")]));

        mailer
            .send(Email::new("user@example.com", "Hello").with_from("ceo@example.com"))
            .await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].from.as_deref(), Some("ceo@example.com"));
        assert!(sent[0].reply_to.is_none());
    }

    #[tokio::test]
    async fn send_bulk_applies_defaults_to_each_message() {
        let (mailer, sent) = recording_mailer(config_from(&[("EMAIL_FROM", "news@example.com")]));

        let report = mailer
            .send_bulk(vec![
                Email::new("a@example.com", "One"),
                Email::new("b@example.com", "Two"),
            ])
            .await;
        assert_eq!(report.total, 2);
        assert_eq!(report.sent, 2);

        let sent = sent.lock().unwrap();
        assert!(sent
            .iter()
            .all(|email| email.from.as_deref() == Some("news@example.com")));
    }

    #[tokio::test]
    async fn newsletter_without_subscribers_skips_provider() {
        let (mailer, sent) = recording_mailer(config_from(&[]));
        let store = MemorySubscriberStore::new();

        let report = mailer
            .send_newsletter(&store, "Issue #1", "<p>Hi</p>", None)
            .await
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(report.all_sent());
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn newsletter_reaches_only_eligible_subscribers() {
        let (mailer, sent) = recording_mailer(config_from(&[]));

        let store = MemorySubscriberStore::new();
        store.subscribe("first@example.com").await.unwrap();
        store.confirm("first@example.com").await.unwrap();
        store.subscribe("pending@example.com").await.unwrap();
        store.subscribe("second@example.com").await.unwrap();
        store.confirm("second@example.com").await.unwrap();
        store.subscribe("gone@example.com").await.unwrap();
        store.confirm("gone@example.com").await.unwrap();
        store.unsubscribe("gone@example.com").await.unwrap();

        let report = mailer
            .send_newsletter(&store, "Issue #1", "<p>Hi</p>", Some("Hi"))
            .await
            .unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.sent, 2);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["first@example.com"]);
        assert_eq!(sent[1].to, vec!["second@example.com"]);
        for email in sent.iter() {
            assert_eq!(email.subject, "Issue #1");
            assert_eq!(email.html.as_deref(), Some("<p>Hi</p>"));
            assert_eq!(email.text.as_deref(), Some("Hi"));
            assert_eq!(email.tags, vec![NEWSLETTER_TAG]);
        }
    }

    #[tokio::test]
    async fn newsletter_propagates_store_errors() {
        let (mailer, sent) = recording_mailer(config_from(&[]));

        let result = mailer
            .send_newsletter(&BrokenStore, "Issue #1", "<p>Hi</p>", None)
            .await;
        assert!(matches!(result, Err(SubscriberError::Backend(_))));
        assert!(sent.lock().unwrap().is_empty());
    }
}
