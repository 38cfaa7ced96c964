//! Flat comment table with relation lookups

use super::index::CommentIndex;
use super::model::Comment;
use crate::error::{CommentsError, Result};
use crate::types::{CommentId, MorphRef};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which rows a query sees with respect to soft deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Only live rows
    #[default]
    Default,
    /// Live and trashed rows
    WithTrashed,
    /// Only trashed rows
    OnlyTrashed,
}

impl Scope {
    /// Whether a row is visible under this scope
    pub fn admits(&self, comment: &Comment) -> bool {
        match self {
            Scope::Default => !comment.is_trashed(),
            Scope::WithTrashed => true,
            Scope::OnlyTrashed => comment.is_trashed(),
        }
    }
}

/// Arena of comments keyed by id, with insertion order and an index for
/// commentable and reply lookups
#[derive(Debug, Clone, Default)]
pub struct CommentTable {
    /// All comments by ID
    comments: HashMap<CommentId, Comment>,
    /// Insertion order
    order: Vec<CommentId>,
    /// Relation index
    index: CommentIndex,
}

impl CommentTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from stored rows, rejecting duplicate ids
    pub fn from_rows(rows: impl IntoIterator<Item = Comment>) -> Result<Self> {
        let mut table = Self::new();
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    /// Insert a comment
    pub fn insert(&mut self, comment: Comment) -> Result<CommentId> {
        let id = comment.id.clone();
        comment.check_extensions()?;

        if self.comments.contains_key(&id) {
            return Err(CommentsError::Validation(format!(
                "Comment with ID {} already exists",
                id
            )));
        }

        self.index.add(&comment);
        self.order.push(id.clone());
        self.comments.insert(id.clone(), comment);
        Ok(id)
    }

    /// Get a live comment by ID
    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.get_scoped(id, Scope::Default)
    }

    /// Get a comment by ID, trashed or not
    pub fn get_with_trashed(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.get(id)
    }

    /// Get a comment by ID under a scope
    pub fn get_scoped(&self, id: &CommentId, scope: Scope) -> Option<&Comment> {
        self.comments.get(id).filter(|c| scope.admits(c))
    }

    /// Mutable access, trashed rows included. Relation columns must not be
    /// changed through this handle; the index is not refreshed.
    pub(crate) fn get_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.get_mut(id)
    }

    /// Permanently remove a row
    pub fn remove(&mut self, id: &CommentId) -> Option<Comment> {
        let comment = self.comments.remove(id)?;
        self.index.remove(&comment);
        self.order.retain(|o| o != id);
        Some(comment)
    }

    /// All comments in insertion order
    pub fn all(&self, scope: Scope) -> Vec<&Comment> {
        self.order
            .iter()
            .filter_map(|id| self.get_scoped(id, scope))
            .collect()
    }

    /// Comments attached to a commentable, in insertion order
    pub fn for_commentable(&self, target: &MorphRef, scope: Scope) -> Vec<&Comment> {
        self.index
            .get_by_commentable(target)
            .iter()
            .filter_map(|id| self.get_scoped(id, scope))
            .collect()
    }

    /// Direct replies to a comment
    pub fn children(&self, id: &CommentId, scope: Scope) -> Vec<&Comment> {
        self.index
            .get_replies(id)
            .iter()
            .filter_map(|id| self.get_scoped(id, scope))
            .collect()
    }

    /// The live comment this one replies to. A trashed parent resolves to
    /// nothing, like any other default-scope lookup.
    pub fn parent(&self, id: &CommentId) -> Option<&Comment> {
        self.comments
            .get(id)
            .and_then(|c| c.parent_id.as_ref())
            .and_then(|parent_id| self.get(parent_id))
    }

    /// Root of the thread containing `id`: follow parent links until a
    /// comment without a (live) parent. A root returns itself.
    pub fn top_comment(&self, id: &CommentId) -> Result<&Comment> {
        let mut current = self
            .get_with_trashed(id)
            .ok_or_else(|| CommentsError::CommentNotFound(id.clone()))?;
        let mut seen = HashSet::new();

        while let Some(parent) = self.parent(&current.id) {
            if !seen.insert(current.id.clone()) {
                return Err(CommentsError::CycleDetected(current.id.clone()));
            }
            current = parent;
        }

        Ok(current)
    }

    /// Ids of every comment attached to a commentable, trashed included
    pub fn ids_for(&self, target: &MorphRef) -> Vec<CommentId> {
        self.index.get_by_commentable(target).to_vec()
    }

    /// Get total row count, trashed included
    pub fn count(&self) -> usize {
        self.comments.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Rebuild index (after deserialization)
    pub fn rebuild_index(&mut self) {
        let Self {
            comments,
            order,
            index,
        } = self;
        index.rebuild(order.iter().filter_map(|id| comments.get(id)));
    }
}

impl Serialize for CommentTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.all(Scope::WithTrashed).serialize(serializer)
    }
}

// Rows are stored as a plain list; the index is rebuilt on load
impl<'de> Deserialize<'de> for CommentTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Comment>::deserialize(deserializer)?;
        CommentTable::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
