use std::fmt;

/// Failure reported by an [`ItemStore`](super::ItemStore) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The existence precondition of a conditional update did not hold.
    ConditionFailed,
    /// The backing store rejected or failed the call.
    Backend {
        /// Store operation that failed (`put`, `get`, `scan`, `delete`, `update`)
        operation: &'static str,
        /// Backend-provided detail, for logs only
        message: String,
    },
    /// Content could not be converted to or from an item (including
    /// unparseable request bodies).
    Codec(String),
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl fmt::Display) -> Self {
        StoreError::Backend {
            operation,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ConditionFailed => write!(f, "conditional check failed: item does not exist"),
            StoreError::Backend { operation, message } => {
                write!(f, "store {operation} failed: {message}")
            }
            StoreError::Codec(message) => write!(f, "codec error: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_dynamo::Error> for StoreError {
    fn from(err: serde_dynamo::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}
