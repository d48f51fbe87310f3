use serde::{Deserialize, Serialize};

/// Request body for `POST /emails`.
#[derive(Debug, Serialize)]
pub struct ResendSendRequest {
    /// Sender address.
    pub from: String,

    /// Recipient addresses.
    pub to: Vec<String>,

    /// Subject line.
    pub subject: String,

    /// HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Plain-text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Reply-To address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    /// Name/value labels. Omitted entirely when the message has no tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<ResendTag>>,
}

/// A single label attached to an outgoing message.
#[derive(Debug, Serialize)]
pub struct ResendTag {
    pub name: String,
    pub value: String,
}

/// Success body for `POST /emails`.
#[derive(Debug, Deserialize)]
pub struct ResendSendResponse {
    /// Identifier Resend assigned to the accepted message.
    pub id: String,
}

/// Error body returned by the Resend API.
#[derive(Debug, Deserialize)]
pub struct ResendErrorResponse {
    /// Human-readable description of what was rejected.
    #[serde(default)]
    pub message: Option<String>,
}
