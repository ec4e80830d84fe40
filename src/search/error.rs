//! Error types for indexing and search operations

/// Result type for indexing and search operations
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while indexing or searching
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Network-level failure talking to the document store
    #[error("Store transport failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The operation exceeded its caller-supplied budget
    #[error("Store operation timed out")]
    Timeout,

    /// Non-2xx response from the document store, body preserved verbatim
    #[error("Store returned status {status}: {body}")]
    Store { status: u16, body: String },

    /// Malformed JSON or response shape from the document store
    #[error("Failed to decode store response: {0}")]
    Decode(String),

    /// A document is missing a field the collection schema requires
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// A filter value that cannot be escaped for the store's filter syntax
    #[error("Filter value cannot be escaped: {0}")]
    InvalidFilterValue(String),
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        IndexError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for IndexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IndexError::Timeout
        } else {
            IndexError::Transport(err)
        }
    }
}

impl From<validator::ValidationErrors> for IndexError {
    fn from(err: validator::ValidationErrors) -> Self {
        let fields: Vec<&str> = err.errors().keys().copied().collect();
        IndexError::SchemaViolation(format!("required field(s) empty: {}", fields.join(", ")))
    }
}
