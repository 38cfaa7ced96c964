//! The commentable capability
//!
//! Host content types opt in by implementing [`Commentable`] (on top of
//! [`Morph`]). Deleting such an entity must go through
//! [`Comments::delete_commentable`] (or call [`Comments::cascade_delete`]
//! right after the host deletion) so its comments are cleaned up before the
//! deletion is reported as done.

use crate::comment::{Comment, Comments, Loaded, Scope, Thread};
use crate::error::Result;
use crate::morph::Morph;
use crate::types::{CommentId, MorphRef};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Content that carries comments
pub trait Commentable: Morph {
    /// Live comments on this entity, in insertion order
    fn comments<'a, U, C>(&self, comments: &'a Comments<U, C>) -> Vec<&'a Comment> {
        comments.comments_on(&self.morph_ref(), Scope::Default)
    }

    /// Live approved comments on this entity
    fn approved_comments<'a, U, C>(&self, comments: &'a Comments<U, C>) -> Vec<&'a Comment> {
        comments.approved_comments_on(&self.morph_ref())
    }

    /// Live comments with their commenters loaded
    fn comments_loaded<U, C>(&self, comments: &Comments<U, C>) -> Result<Vec<Loaded<U>>> {
        comments.comments_on_loaded(&self.morph_ref(), Scope::Default)
    }

    /// Live approved comments with their commenters loaded
    fn approved_comments_loaded<U, C>(&self, comments: &Comments<U, C>) -> Result<Vec<Loaded<U>>> {
        comments.approved_comments_on_loaded(&self.morph_ref())
    }
}

/// How a cascade removed comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeMode {
    Soft,
    Hard,
}

impl fmt::Display for CascadeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeMode::Soft => write!(f, "soft"),
            CascadeMode::Hard => write!(f, "hard"),
        }
    }
}

/// Outcome of a cascade delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub target: MorphRef,
    pub mode: CascadeMode,
    /// Comments that changed state (trashed, or removed)
    pub affected: Vec<CommentId>,
}

impl CascadeReport {
    /// Number of affected comments
    pub fn count(&self) -> usize {
        self.affected.len()
    }
}

impl<U, C> Comments<U, C> {
    /// Comments attached to a commentable under a soft-delete scope
    pub fn comments_on(&self, target: &MorphRef, scope: Scope) -> Vec<&Comment> {
        self.table().for_commentable(target, scope)
    }

    /// Live approved comments attached to a commentable
    pub fn approved_comments_on(&self, target: &MorphRef) -> Vec<&Comment> {
        self.comments_on(target, Scope::Default)
            .into_iter()
            .filter(|c| c.approved)
            .collect()
    }

    /// Comments on a commentable under a scope, commenters loaded
    pub fn comments_on_loaded(&self, target: &MorphRef, scope: Scope) -> Result<Vec<Loaded<U>>> {
        self.load_all(self.comments_on(target, scope))
    }

    /// Live approved comments on a commentable, commenters loaded
    pub fn approved_comments_on_loaded(&self, target: &MorphRef) -> Result<Vec<Loaded<U>>> {
        self.load_all(self.approved_comments_on(target))
    }

    /// Live comments on a commentable as nested threads
    pub fn thread_on(&self, target: &MorphRef) -> Thread<'_> {
        self.table().thread(target)
    }

    /// Remove every comment attached to `target`: soft-delete the live ones
    /// when soft deletes are on, otherwise hard-delete all rows, trashed
    /// ones included. Runs as one bulk operation without per-comment
    /// notifications.
    pub fn cascade_delete(&mut self, target: &MorphRef) -> CascadeReport {
        let soft = self.config().soft_deletes;
        let table = self.table_mut();
        let mut affected = Vec::new();

        for id in table.ids_for(target) {
            if soft {
                if let Some(comment) = table.get_mut(&id).filter(|c| !c.is_trashed()) {
                    comment.trash();
                    affected.push(id);
                }
            } else if table.remove(&id).is_some() {
                affected.push(id);
            }
        }

        let mode = if soft {
            CascadeMode::Soft
        } else {
            CascadeMode::Hard
        };
        info!(commentable = %target, %mode, count = affected.len(), "cascaded comment delete");

        CascadeReport {
            target: target.clone(),
            mode,
            affected,
        }
    }

    /// Run the host's deletion of `entity`, then cascade to its comments.
    /// If the host deletion fails, comments are left untouched.
    pub fn delete_commentable<E, F, HostErr>(
        &mut self,
        entity: &E,
        delete: F,
    ) -> std::result::Result<CascadeReport, HostErr>
    where
        E: Commentable,
        F: FnOnce(&E) -> std::result::Result<(), HostErr>,
    {
        delete(entity)?;
        Ok(self.cascade_delete(&entity.morph_ref()))
    }
}
