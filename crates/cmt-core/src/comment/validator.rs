//! Optional comment validation
//!
//! The comment service does not validate on its own. Hosts that want a
//! policy install a validator with `Comments::with_validator`.

use super::model::Comment;
use crate::config::ValidationConfig;
use crate::error::{CommentsError, Result};

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 10000;

/// Validator for comments
#[derive(Debug, Clone)]
pub struct CommentValidator {
    max_length: usize,
    require_guest_name: bool,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
            require_guest_name: true,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            ..Self::new()
        }
    }

    /// Create a validator from configuration
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            max_length: config.max_comment_length,
            require_guest_name: config.require_guest_name,
        }
    }

    /// Validate comment content
    pub fn validate_content(&self, content: &str) -> Result<()> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Err(CommentsError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > self.max_length {
            return Err(CommentsError::Validation(format!(
                "Comment content exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    /// Validate guest identity fields
    pub fn validate_guest(&self, name: Option<&str>, email: Option<&str>) -> Result<()> {
        if self.require_guest_name && name.map(|n| n.trim().is_empty()).unwrap_or(true) {
            return Err(CommentsError::Validation(
                "Guest comments require a guest name".to_string(),
            ));
        }

        if let Some(email) = email {
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !valid {
                return Err(CommentsError::Validation(format!(
                    "Invalid guest email: {}",
                    email
                )));
            }
        }

        Ok(())
    }

    /// Validate a complete comment
    pub fn validate(&self, comment: &Comment) -> Result<()> {
        self.validate_content(&comment.comment)?;

        if comment.is_guest() {
            self.validate_guest(comment.guest_name.as_deref(), comment.guest_email.as_deref())?;
        }

        Ok(())
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}
