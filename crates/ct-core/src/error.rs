//! Error types for comment-tree

use thiserror::Error;

/// Main error type for comment-tree
#[derive(Debug, Error)]
pub enum TreeError {
    /// Two records share an identifier
    #[error("Duplicate comment id: {0}")]
    DuplicateId(String),

    /// Input document is not a sequence of records
    #[error("Expected a sequence of comments, found {0}")]
    NotASequence(String),

    /// A record is not a JSON object
    #[error("Comment at position {index} is not an object")]
    NotAnObject { index: usize },

    /// A record has no identifier field
    #[error("Comment at position {index} has no '{field}' field")]
    MissingId { index: usize, field: String },

    /// An identifier or parent identifier has an unusable type
    #[error("Comment at position {index} has an invalid '{field}' value: {value}")]
    InvalidId {
        index: usize,
        field: String,
        value: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TreeError>,
    },
}

impl TreeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TreeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for comment-tree
pub type Result<T> = std::result::Result<T, TreeError>;
