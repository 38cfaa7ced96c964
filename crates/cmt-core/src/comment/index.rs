//! Comment indexing for relation lookups

use super::model::Comment;
use crate::types::{CommentId, MorphRef};
use std::collections::HashMap;

/// Lookup index over the comment table. Id lists keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    /// Index by attached content
    by_commentable: HashMap<MorphRef, Vec<CommentId>>,
    /// Replies by the comment they reply to
    by_parent: HashMap<CommentId, Vec<CommentId>>,
}

impl CommentIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the index
    pub fn add(&mut self, comment: &Comment) {
        self.by_commentable
            .entry(comment.commentable.clone())
            .or_default()
            .push(comment.id.clone());

        if let Some(parent_id) = &comment.parent_id {
            self.by_parent
                .entry(parent_id.clone())
                .or_default()
                .push(comment.id.clone());
        }
    }

    /// Remove a comment from the index
    pub fn remove(&mut self, comment: &Comment) {
        if let Some(ids) = self.by_commentable.get_mut(&comment.commentable) {
            ids.retain(|id| id != &comment.id);
            if ids.is_empty() {
                self.by_commentable.remove(&comment.commentable);
            }
        }

        if let Some(parent_id) = &comment.parent_id {
            if let Some(ids) = self.by_parent.get_mut(parent_id) {
                ids.retain(|id| id != &comment.id);
                if ids.is_empty() {
                    self.by_parent.remove(parent_id);
                }
            }
        }
    }

    /// Comment ids attached to a commentable
    pub fn get_by_commentable(&self, target: &MorphRef) -> &[CommentId] {
        self.by_commentable
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ids of direct replies to a comment
    pub fn get_replies(&self, parent_id: &CommentId) -> &[CommentId] {
        self.by_parent
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check if a commentable has any comments (trashed included)
    pub fn has_comments(&self, target: &MorphRef) -> bool {
        !self.get_by_commentable(target).is_empty()
    }

    /// Clear the entire index
    pub fn clear(&mut self) {
        self.by_commentable.clear();
        self.by_parent.clear();
    }

    /// Rebuild index from a collection of comments
    pub fn rebuild(&mut self, comments: impl IntoIterator<Item = impl std::borrow::Borrow<Comment>>) {
        self.clear();
        for comment in comments {
            self.add(comment.borrow());
        }
    }
}
