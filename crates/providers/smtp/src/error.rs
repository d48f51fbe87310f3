use thiserror::Error;

/// Errors raised while configuring the SMTP provider or assembling a message
/// for the wire.
///
/// Only construction hands these to the caller. At send time every failure,
/// including these, is folded into a failed outcome instead.
#[derive(Debug, Error)]
pub enum SmtpError {
    /// The relay transport could not be built from the configuration.
    #[error("SMTP relay error: {0}")]
    Relay(String),

    /// An address on the message failed to parse.
    #[error("invalid {0} address: {1}")]
    Address(&'static str, String),

    /// The MIME message could not be assembled.
    #[error("failed to build email: {0}")]
    Build(String),
}
