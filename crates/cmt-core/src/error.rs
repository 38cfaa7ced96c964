//! Error types for cmt

use crate::types::{CommentId, MorphType};
use thiserror::Error;

/// Main error type for cmt
#[derive(Debug, Error)]
pub enum CommentsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Comment not found (or trashed, for default-scope lookups)
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Reply target does not exist
    #[error("Parent comment not found: {0}")]
    ParentNotFound(CommentId),

    /// Parent chain loops back on itself
    #[error("Cycle detected in reply chain at comment {0}")]
    CycleDetected(CommentId),

    /// No loader registered for a morph type tag
    #[error("Unknown morph type: {0}")]
    UnknownMorphType(MorphType),

    /// Malformed `type:id` reference
    #[error("Invalid morph reference: {0}")]
    InvalidMorphRef(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CommentsError>,
    },
}

impl CommentsError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CommentsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for CommentsError {
    fn from(err: toml::de::Error) -> Self {
        CommentsError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for CommentsError {
    fn from(err: toml::ser::Error) -> Self {
        CommentsError::Toml(err.to_string())
    }
}

/// Result type alias for cmt
pub type Result<T> = std::result::Result<T, CommentsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = CommentId::new();
        let err = CommentsError::CommentNotFound(id.clone());
        assert_eq!(err.to_string(), format!("Comment not found: {}", id));
    }

    #[test]
    fn test_unknown_morph_type_display() {
        let err = CommentsError::UnknownMorphType(MorphType::new("Podcast"));
        assert_eq!(err.to_string(), "Unknown morph type: Podcast");
    }

    #[test]
    fn test_error_with_context() {
        let err = CommentsError::Validation("empty body".to_string());
        let err = err.with_context("Failed to create comment");
        assert!(err.to_string().contains("Failed to create comment"));
        assert!(err.to_string().contains("empty body"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CommentsError = io_err.into();
        assert!(matches!(err, CommentsError::Io(_)));
    }
}
