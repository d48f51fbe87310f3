/// Configuration for the SendGrid provider.
#[derive(Clone)]
pub struct SendGridConfig {
    /// API key used to authenticate requests.
    pub api_key: String,

    /// Sender address used when a message does not set one.
    pub default_from: String,

    /// Base URL for the SendGrid API. Override this for testing against a
    /// mock server.
    pub api_base_url: String,
}

impl std::fmt::Debug for SendGridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridConfig")
            .field("api_key", &"[REDACTED]")
            .field("default_from", &self.default_from)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl SendGridConfig {
    /// Create a new configuration with the given API key and default sender.
    ///
    /// Uses the default SendGrid API base URL (`https://api.sendgrid.com`).
    pub fn new(api_key: impl Into<String>, default_from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            default_from: default_from.into(),
            api_base_url: "https://api.sendgrid.com".to_owned(),
        }
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_api_base_url() {
        let config = SendGridConfig::new("SG.test_key", "noreply@example.com");
        assert_eq!(config.api_base_url, "https://api.sendgrid.com");
        assert_eq!(config.api_key, "SG.test_key");
    }

    #[test]
    fn with_custom_api_base_url() {
        let config = SendGridConfig::new("SG.key", "noreply@example.com")
            .with_api_base_url("http://localhost:9999");
        assert_eq!(config.api_base_url, "http://localhost:9999");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SendGridConfig::new("SG.test_placeholder_value", "noreply@example.com");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"), "api key must be redacted");
        assert!(
            !debug.contains("SG.test_placeholder_value"),
            "api key must not appear in debug output"
        );
    }
}
