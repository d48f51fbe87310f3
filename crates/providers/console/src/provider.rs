use hermod_core::{Email, SendOutcome};
use hermod_provider::{Pacing, Provider};
use tracing::{debug, info};
use uuid::Uuid;

/// Characters of plain-text body included in the log preview.
const BODY_PREVIEW_CHARS: usize = 500;

/// A provider that logs the message and reports success without performing
/// any network I/O.
///
/// This is the default and fallback backend: local development and
/// misconfigured deployments degrade to it, so sends keep succeeding (and
/// stay visible in the logs) until a real vendor is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProvider;

impl ConsoleProvider {
    /// Create a new console provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Provider for ConsoleProvider {
    fn name(&self) -> &str {
        "console"
    }

    #[allow(clippy::unused_async)]
    async fn send(&self, email: &Email) -> SendOutcome {
        let message_id = format!("console-{}", Uuid::now_v7());
        info!(
            provider = "console",
            to = ?email.to,
            subject = %email.subject,
            from = email.from.as_deref().unwrap_or("default"),
            reply_to = email.reply_to.as_deref(),
            tags = ?email.tags,
            message_id = %message_id,
            "email logged, not sent"
        );
        if let Some(text) = email.text.as_deref() {
            debug!(
                preview = %preview(text),
                truncated = text.chars().count() > BODY_PREVIEW_CHARS,
                "message body"
            );
        } else if email.html.is_some() {
            debug!("html-only body, preview skipped");
        }
        SendOutcome::sent(message_id)
    }

    fn pacing(&self) -> Pacing {
        Pacing::none()
    }

    #[allow(clippy::unused_async)]
    async fn verify(&self) -> bool {
        true
    }
}

/// First [`BODY_PREVIEW_CHARS`] characters, cut on a char boundary.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_provider_name() {
        assert_eq!(Provider::name(&ConsoleProvider::new()), "console");
    }

    #[tokio::test]
    async fn send_always_succeeds_with_console_id() {
        let provider = ConsoleProvider::new();
        let outcome = provider.send(&Email::new("user@example.com", "Hello")).await;
        assert!(outcome.is_sent());
        let id = outcome.message_id().unwrap();
        assert!(id.starts_with("console-"));
        assert!(id.len() > "console-".len());
    }

    #[tokio::test]
    async fn send_accepts_a_bodyless_message() {
        let provider = ConsoleProvider::new();
        let outcome = provider.send(&Email::new("user@example.com", "")).await;
        assert!(outcome.is_sent());
    }

    #[tokio::test]
    async fn message_ids_are_unique() {
        let provider = ConsoleProvider::new();
        let email = Email::new("user@example.com", "Hello");
        let first = provider.send(&email).await;
        let second = provider.send(&email).await;
        assert_ne!(first.message_id(), second.message_id());
    }

    #[tokio::test]
    async fn bulk_send_succeeds_for_each_message() {
        let provider = ConsoleProvider::new();
        let emails: Vec<Email> = (0..3)
            .map(|i| Email::new(format!("user{i}@example.com"), format!("Hello {i}")))
            .collect();

        let report = provider.send_bulk(&emails).await;
        assert_eq!(report.total, 3);
        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, 0);
        assert!(report.results.iter().all(SendOutcome::is_sent));
    }

    #[tokio::test]
    async fn verify_is_always_true() {
        assert!(ConsoleProvider::new().verify().await);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(BODY_PREVIEW_CHARS + 10);
        let cut = preview(&body);
        assert_eq!(cut.chars().count(), BODY_PREVIEW_CHARS);
    }
}
