use serde::{Deserialize, Serialize};

/// An outbound email message.
///
/// Optional fields left unset are filled with service-level defaults at
/// dispatch time. The type does not validate addresses or require a body;
/// a degenerate message is forwarded as-is and the provider's rejection
/// comes back as a failed outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    /// Recipient addresses. At least one for a deliverable message.
    pub to: Vec<String>,

    /// Subject line.
    pub subject: String,

    /// HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Plain-text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Sender address. Overrides the configured default when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Reply-To address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    /// Labels forwarded to the provider (Resend tags, SendGrid categories).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Email {
    /// Create a message to a single recipient.
    #[must_use]
    pub fn new(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::to_many(vec![to.into()], subject)
    }

    /// Create a message addressed to several recipients.
    #[must_use]
    pub fn to_many(to: Vec<String>, subject: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            html: None,
            text: None,
            from: None,
            reply_to: None,
            tags: Vec::new(),
        }
    }

    /// Set the HTML body.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Set the plain-text body.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Override the sender address for this message.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the Reply-To address.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Append a single tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Replace the tag list.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}
