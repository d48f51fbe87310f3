use serde::{Deserialize, Serialize};

/// Outcome of a single delivery attempt.
///
/// Delivery failure is data, not a fault. A rejected or undeliverable
/// message comes back as `Failed` with a reason; the error channel of the
/// calling function stays reserved for faults outside the delivery itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    /// The provider accepted the message.
    Sent {
        /// Provider-assigned message id, when the vendor returns one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    /// The provider rejected the message or was unreachable.
    Failed {
        /// Human-readable reason, suitable for logs and reports.
        error: String,
    },
}

impl SendOutcome {
    /// Accepted delivery with a provider-assigned id.
    #[must_use]
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self::Sent {
            message_id: Some(message_id.into()),
        }
    }

    /// Accepted delivery from a transport that assigns no id.
    #[must_use]
    pub fn sent_without_id() -> Self {
        Self::Sent { message_id: None }
    }

    /// Failed delivery with a reason.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Whether the provider accepted the message.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// Provider-assigned message id, if any.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Sent { message_id } => message_id.as_deref(),
            Self::Failed { .. } => None,
        }
    }

    /// Failure reason, when the delivery failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Sent { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Aggregate result of a bulk dispatch.
///
/// `results` is index-aligned with the input batch and the counts are
/// derived from it, so `sent + failed == total == results.len()` holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    /// Number of messages attempted.
    pub total: usize,

    /// Messages accepted by the provider.
    pub sent: usize,

    /// Messages that failed.
    pub failed: usize,

    /// Per-message outcomes in input order.
    pub results: Vec<SendOutcome>,
}

impl BulkReport {
    /// Report for an empty batch.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0,
            sent: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    /// Build a report from per-message outcomes, deriving the counts.
    #[must_use]
    pub fn from_results(results: Vec<SendOutcome>) -> Self {
        let sent = results.iter().filter(|outcome| outcome.is_sent()).count();
        Self {
            total: results.len(),
            sent,
            failed: results.len() - sent,
            results,
        }
    }

    /// Whether every message in the batch was accepted.
    #[must_use]
    pub fn all_sent(&self) -> bool {
        self.failed == 0
    }
}

impl FromIterator<SendOutcome> for BulkReport {
    fn from_iter<I: IntoIterator<Item = SendOutcome>>(iter: I) -> Self {
        Self::from_results(iter.into_iter().collect())
    }
}
