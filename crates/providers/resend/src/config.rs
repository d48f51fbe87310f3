/// Configuration for the Resend provider.
#[derive(Clone)]
pub struct ResendConfig {
    /// API key used to authenticate requests.
    pub api_key: String,

    /// Sender address used when a message does not set one.
    pub default_from: String,

    /// Base URL for the Resend API. Override this for testing against a
    /// mock server.
    pub api_base_url: String,
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &"[REDACTED]")
            .field("default_from", &self.default_from)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl ResendConfig {
    /// Create a new configuration with the given API key and default sender.
    ///
    /// Uses the default Resend API base URL (`https://api.resend.com`).
    pub fn new(api_key: impl Into<String>, default_from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            default_from: default_from.into(),
            api_base_url: "https://api.resend.com".to_owned(),
        }
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
