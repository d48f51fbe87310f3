use std::fmt;

use hermod_smtp::SmtpConfig;
use tracing::warn;

/// Sender address used when `EMAIL_FROM` is not set.
pub const DEFAULT_FROM: &str = "noreply@localhost";

/// The delivery backend a [`MailerConfig`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Log messages to the console instead of sending them.
    Console,
    /// Resend HTTP API.
    Resend,
    /// SendGrid HTTP API.
    SendGrid,
    /// Postmark HTTP API. Recognized but not implemented; resolves to console.
    Postmark,
    /// Direct SMTP relay.
    Smtp,
}

impl ProviderKind {
    /// Parse a provider selector, as found in `EMAIL_PROVIDER`.
    ///
    /// Matching is case-insensitive. An unrecognized selector falls back to
    /// [`ProviderKind::Console`] with a warning so a typo in deployment
    /// configuration degrades to logging rather than failing startup.
    #[must_use]
    pub fn from_selector(selector: &str) -> Self {
        match selector.to_ascii_lowercase().as_str() {
            "console" => Self::Console,
            "resend" => Self::Resend,
            "sendgrid" => Self::SendGrid,
            "postmark" => Self::Postmark,
            "smtp" => Self::Smtp,
            other => {
                warn!(selector = %other, "unrecognized email provider selector, using console");
                Self::Console
            }
        }
    }

    /// The canonical selector string for this provider kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Resend => "resend",
            Self::SendGrid => "sendgrid",
            Self::Postmark => "postmark",
            Self::Smtp => "smtp",
        }
    }
}

/// Resolved mailer configuration.
///
/// Usually built from the environment via [`MailerConfig::from_env`]; tests
/// drive [`MailerConfig::from_env_with`] with a closure instead of mutating
/// process-wide variables.
#[derive(Clone)]
pub struct MailerConfig {
    /// Which provider to construct.
    pub provider: ProviderKind,

    /// API key for the selected HTTP provider, when one is required.
    pub api_key: Option<String>,

    /// Sender address applied to messages that do not set one.
    pub default_from: String,

    /// Reply-To address applied to messages that do not set one.
    pub default_reply_to: Option<String>,

    /// SMTP relay settings, present when `SMTP_HOST` is set.
    pub smtp: Option<SmtpConfig>,
}

impl MailerConfig {
    /// Resolve configuration from process environment variables.
    ///
    /// Reads:
    /// - `EMAIL_PROVIDER` (selector, defaults to `console`)
    /// - `RESEND_API_KEY` / `SENDGRID_API_KEY` / `POSTMARK_API_KEY`
    /// - `EMAIL_FROM` (defaults to `noreply@localhost`)
    /// - `EMAIL_REPLY_TO` (optional)
    /// - `SMTP_HOST`, `SMTP_PORT` (default 587), `SMTP_USERNAME`,
    ///   `SMTP_PASSWORD`, `SMTP_TLS` (default `true`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let provider = lookup("EMAIL_PROVIDER")
            .map_or(ProviderKind::Console, |s| ProviderKind::from_selector(&s));

        let default_from = lookup("EMAIL_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string());
        let default_reply_to = lookup("EMAIL_REPLY_TO");

        let api_key = match provider {
            ProviderKind::Resend => lookup("RESEND_API_KEY"),
            ProviderKind::SendGrid => lookup("SENDGRID_API_KEY"),
            ProviderKind::Postmark => lookup("POSTMARK_API_KEY"),
            ProviderKind::Console | ProviderKind::Smtp => None,
        };

        let smtp = lookup("SMTP_HOST").map(|host| {
            let mut config = SmtpConfig::new(host, default_from.clone());
            if let Some(port) = lookup("SMTP_PORT").and_then(|p| p.parse().ok()) {
                config = config.with_port(port);
            }
            if let (Some(username), Some(password)) =
                (lookup("SMTP_USERNAME"), lookup("SMTP_PASSWORD"))
            {
                config = config.with_credentials(username, password);
            }
            if let Some(tls) = lookup("SMTP_TLS").and_then(|t| t.parse().ok()) {
                config = config.with_tls(tls);
            }
            config
        });

        Self {
            provider,
            api_key,
            default_from,
            default_reply_to,
            smtp,
        }
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Console,
            api_key: None,
            default_from: DEFAULT_FROM.to_string(),
            default_reply_to: None,
            smtp: None,
        }
    }
}

impl fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_from", &self.default_from)
            .field("default_reply_to", &self.default_reply_to)
            .field("smtp", &self.smtp)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn resolve(vars: &[(&str, &str)]) -> MailerConfig {
        let vars = env(vars);
        MailerConfig::from_env_with(|name| vars.get(name).cloned())
    }

    #[test]
    fn selector_is_case_insensitive() {
        assert_eq!(ProviderKind::from_selector("Resend"), ProviderKind::Resend);
        assert_eq!(
            ProviderKind::from_selector("SENDGRID"),
            ProviderKind::SendGrid
        );
        assert_eq!(ProviderKind::from_selector("smtp"), ProviderKind::Smtp);
        assert_eq!(
            ProviderKind::from_selector("Postmark"),
            ProviderKind::Postmark
        );
    }

    #[test]
    fn unrecognized_selector_falls_back_to_console() {
        assert_eq!(
            ProviderKind::from_selector("mailchimp"),
            ProviderKind::Console
        );
        assert_eq!(ProviderKind::from_selector(""), ProviderKind::Console);
    }

    #[test]
    fn empty_environment_defaults_to_console() {
        let config = resolve(&[]);
        assert_eq!(config.provider, ProviderKind::Console);
        assert_eq!(config.default_from, DEFAULT_FROM);
        assert!(config.api_key.is_none());
        assert!(config.default_reply_to.is_none());
        assert!(config.smtp.is_none());
    }

    #[test]
    fn resend_key_is_read_for_resend_only() {
        let config = resolve(&[
            ("EMAIL_PROVIDER", "resend"),
            ("RESEND_API_KEY", "re_123"),
            ("SENDGRID_API_KEY", "sg_456"),
        ]);
        assert_eq!(config.provider, ProviderKind::Resend);
        assert_eq!(config.api_key.as_deref(), Some("re_123"));

        let config = resolve(&[("EMAIL_PROVIDER", "sendgrid"), ("RESEND_API_KEY", "re_123")]);
        assert_eq!(config.provider, ProviderKind::SendGrid);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn from_and_reply_to_are_resolved() {
        let config = resolve(&[
            ("EMAIL_FROM", "news@example.com"),
            ("EMAIL_REPLY_TO", "replies@example.com"),
        ]);
        assert_eq!(config.default_from, "news@example.com");
        assert_eq!(config.default_reply_to.as_deref(), Some("replies@example.com"));
    }

    #[test]
    fn smtp_settings_are_assembled() {
        let config = resolve(&[
            ("EMAIL_PROVIDER", "smtp"),
            ("EMAIL_FROM", "news@example.com"),
            ("SMTP_HOST", "mail.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USERNAME", "mailer"),
            ("SMTP_PASSWORD", "hunter2"),
            ("SMTP_TLS", "false"),
        ]);
        assert_eq!(config.provider, ProviderKind::Smtp);
        let smtp = config.smtp.expect("smtp settings should be present");
        assert_eq!(smtp.host, "mail.example.com");
        assert_eq!(smtp.port, 2525);
        assert_eq!(smtp.username.as_deref(), Some("mailer"));
        assert_eq!(smtp.password.as_deref(), Some("hunter2"));
        assert!(!smtp.tls);
        assert_eq!(smtp.default_from, "news@example.com");
    }

    #[test]
    fn smtp_defaults_apply_when_unset() {
        let config = resolve(&[("EMAIL_PROVIDER", "smtp"), ("SMTP_HOST", "mail.example.com")]);
        let smtp = config.smtp.expect("smtp settings should be present");
        assert_eq!(smtp.port, 587);
        assert!(smtp.tls);
        assert!(smtp.username.is_none());
        assert_eq!(smtp.default_from, DEFAULT_FROM);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = resolve(&[("EMAIL_PROVIDER", "resend"), ("RESEND_API_KEY", "re_secret")]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("re_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
