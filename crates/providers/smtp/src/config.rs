use serde::{Deserialize, Serialize};

/// Settings for connecting to an SMTP relay.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay hostname.
    pub host: String,

    /// Relay port. Defaults to 587 (STARTTLS submission port).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional username for authentication.
    pub username: Option<String>,

    /// Optional password for authentication.
    pub password: Option<String>,

    /// Whether to use STARTTLS. Defaults to `true`.
    #[serde(default = "default_tls")]
    pub tls: bool,

    /// Sender address used when a message does not set one.
    pub default_from: String,
}

fn default_port() -> u16 {
    587
}

fn default_tls() -> bool {
    true
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("tls", &self.tls)
            .field("default_from", &self.default_from)
            .finish()
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 587,
            username: None,
            password: None,
            tls: true,
            default_from: "noreply@localhost".to_owned(),
        }
    }
}

impl SmtpConfig {
    /// Create a new configuration with the given relay host and default
    /// sender, port 587 and STARTTLS enabled.
    pub fn new(host: impl Into<String>, default_from: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            default_from: default_from.into(),
            ..Self::default()
        }
    }

    /// Set authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Override the default relay port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set whether STARTTLS should be used.
    #[must_use]
    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }
}
