use serde::{Deserialize, Serialize};

/// Request body for `POST /v3/mail/send`.
#[derive(Debug, Serialize)]
pub struct SendGridSendRequest {
    /// One personalization block carrying every recipient.
    pub personalizations: Vec<SendGridPersonalization>,

    /// Sender address.
    pub from: SendGridAddress,

    /// Subject line.
    pub subject: String,

    /// Body parts. The plain-text part, when present, must precede the HTML
    /// part; SendGrid rejects other orderings.
    pub content: Vec<SendGridContent>,

    /// Reply-To address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<SendGridAddress>,

    /// Category labels. Omitted entirely when the message has no tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Recipients of a single logical message.
#[derive(Debug, Serialize)]
pub struct SendGridPersonalization {
    pub to: Vec<SendGridAddress>,
}

/// An email address wrapped the way the v3 API expects.
#[derive(Debug, Serialize)]
pub struct SendGridAddress {
    pub email: String,
}

impl SendGridAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// One MIME part of the message body.
#[derive(Debug, Serialize)]
pub struct SendGridContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

/// Error body returned by the SendGrid API.
#[derive(Debug, Deserialize)]
pub struct SendGridErrorResponse {
    #[serde(default)]
    pub errors: Vec<SendGridApiError>,
}

/// A single entry of the `errors` array.
#[derive(Debug, Deserialize)]
pub struct SendGridApiError {
    #[serde(default)]
    pub message: Option<String>,
}
