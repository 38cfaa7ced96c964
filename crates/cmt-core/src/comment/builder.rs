//! Comment builder for fluent API
//!
//! Relation columns (commentable, commenter, parent) can only be set
//! through the builder's dedicated methods; caller-supplied attributes go
//! through [`CommentFields`], which carries only the fillable set.

use super::model::{Comment, CommentFields};
use crate::types::{CommentId, Extensions, MorphRef};
use chrono::Utc;

/// Builder for creating comments with fluent API
#[derive(Debug, Clone)]
pub struct CommentBuilder {
    commentable: MorphRef,
    commenter: Option<MorphRef>,
    parent_id: Option<CommentId>,
    fields: CommentFields,
    default_approved: bool,
    extensions: Extensions,
}

impl CommentBuilder {
    /// Start a comment attached to the given content
    pub fn on(commentable: MorphRef) -> Self {
        Self {
            commentable,
            commenter: None,
            parent_id: None,
            fields: CommentFields::default(),
            default_approved: false,
            extensions: Extensions::new(),
        }
    }

    /// Set the registered author
    pub fn by(mut self, commenter: MorphRef) -> Self {
        self.commenter = Some(commenter);
        self
    }

    /// Make this a reply to another comment
    pub fn reply_to(mut self, parent_id: CommentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Merge fillable fields; later calls override earlier ones
    pub fn fill(mut self, fields: CommentFields) -> Self {
        let current = &mut self.fields;
        if fields.comment.is_some() {
            current.comment = fields.comment;
        }
        if fields.approved.is_some() {
            current.approved = fields.approved;
        }
        if fields.is_featured.is_some() {
            current.is_featured = fields.is_featured;
        }
        if fields.guest_name.is_some() {
            current.guest_name = fields.guest_name;
        }
        if fields.guest_email.is_some() {
            current.guest_email = fields.guest_email;
        }
        self
    }

    /// Set the comment body
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.fields.comment = Some(content.into());
        self
    }

    /// Post as a guest
    pub fn guest(mut self, name: impl Into<String>, email: Option<String>) -> Self {
        self.fields = self.fields.guest(name, email);
        self
    }

    /// Approval applied when the fields leave `approved` unset
    pub fn default_approval(mut self, approved: bool) -> Self {
        self.default_approved = approved;
        self
    }

    /// Set a host extension column
    pub fn extension<T: serde::Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        self.extensions.set(key, value);
        self
    }

    /// Commentable this builder targets
    pub fn commentable(&self) -> &MorphRef {
        &self.commentable
    }

    /// Parent this builder replies to
    pub fn parent_id(&self) -> Option<&CommentId> {
        self.parent_id.as_ref()
    }

    /// Build the comment with a fresh identifier and timestamps
    pub fn build(self) -> Comment {
        let now = Utc::now();

        Comment {
            id: CommentId::new(),
            comment: self.fields.comment.unwrap_or_default(),
            approved: self.fields.approved.unwrap_or(self.default_approved),
            is_featured: self.fields.is_featured.unwrap_or(false),
            guest_name: self.fields.guest_name.flatten(),
            guest_email: self.fields.guest_email.flatten(),
            commenter: self.commenter,
            commentable: self.commentable,
            parent_id: self.parent_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            extensions: self.extensions,
        }
    }
}
