use thiserror::Error;

/// Errors that can occur during subscriber store operations.
#[derive(Debug, Error)]
pub enum SubscriberError {
    /// Failed to connect to the backing store.
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend rejected or failed an operation.
    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SubscriberError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection error: refused");

        let err = SubscriberError::Backend("duplicate key".to_string());
        assert_eq!(err.to_string(), "backend error: duplicate key");
    }
}
