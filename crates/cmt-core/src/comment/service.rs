//! Comment service: lifecycle operations, relation resolution, notifications

use super::builder::CommentBuilder;
use super::model::{Comment, CommentFields};
use super::table::{CommentTable, Scope};
use super::validator::CommentValidator;
use crate::config::CommentsConfig;
use crate::error::{CommentsError, Result};
use crate::events::{CommentListener, EventDispatcher, EventKind};
use crate::morph::MorphRegistry;
use crate::types::{CommentId, MorphRef};
use tracing::{debug, info};

/// A comment together with its eagerly resolved commenter
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<U> {
    pub comment: Comment,
    /// `None` for guest comments or when the author no longer exists
    pub commenter: Option<U>,
}

/// Comment service over a comment table.
///
/// `U` is the host's commenter sum type and `C` its content sum type; both
/// are produced by the registered morph loaders. Every mutation takes
/// `&mut self`, so one operation owns the table at a time.
#[derive(Debug)]
pub struct Comments<U = MorphRef, C = MorphRef> {
    config: CommentsConfig,
    table: CommentTable,
    events: EventDispatcher,
    commenters: MorphRegistry<U>,
    commentables: MorphRegistry<C>,
    validator: Option<CommentValidator>,
}

impl<U, C> Comments<U, C> {
    /// Create a service over an empty table
    pub fn new(config: CommentsConfig) -> Self {
        Self::with_table(config, CommentTable::new())
    }

    /// Create a service over existing rows
    pub fn with_table(config: CommentsConfig, table: CommentTable) -> Self {
        Self {
            config,
            table,
            events: EventDispatcher::new(),
            commenters: MorphRegistry::new(),
            commentables: MorphRegistry::new(),
            validator: None,
        }
    }

    /// Install a validation policy applied on create and update
    pub fn with_validator(mut self, validator: CommentValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &CommentsConfig {
        &self.config
    }

    /// Underlying table
    pub fn table(&self) -> &CommentTable {
        &self.table
    }

    /// Mutable table access for the cascade
    pub(crate) fn table_mut(&mut self) -> &mut CommentTable {
        &mut self.table
    }

    /// Consume the service, returning its rows
    pub fn into_table(self) -> CommentTable {
        self.table
    }

    /// Register a lifecycle listener
    pub fn subscribe(&mut self, listener: impl CommentListener + 'static) {
        self.events.subscribe(listener);
    }

    /// Commenter loaders
    pub fn commenters_mut(&mut self) -> &mut MorphRegistry<U> {
        &mut self.commenters
    }

    /// Commentable loaders
    pub fn commentables_mut(&mut self) -> &mut MorphRegistry<C> {
        &mut self.commentables
    }

    /// Create a comment. Identifier, timestamps and relation columns come
    /// from the builder context, never from the fillable fields.
    pub fn create(&mut self, builder: CommentBuilder) -> Result<Comment> {
        if let Some(parent_id) = builder.parent_id() {
            if self.table.get_with_trashed(parent_id).is_none() {
                return Err(CommentsError::ParentNotFound(parent_id.clone()));
            }
        }

        let comment = builder
            .default_approval(self.config.approved_by_default)
            .build();

        if let Some(validator) = &self.validator {
            validator.validate(&comment)?;
        }

        self.table.insert(comment.clone())?;
        info!(
            comment = %comment.id,
            commentable = %comment.commentable,
            reply = comment.parent_id.is_some(),
            "comment created"
        );
        self.events.dispatch(EventKind::Created, &comment);
        Ok(comment)
    }

    /// Reply to an existing comment, on the same commentable
    pub fn reply(&mut self, parent_id: &CommentId, builder: CommentBuilder) -> Result<Comment> {
        let parent = self
            .table
            .get(parent_id)
            .ok_or_else(|| CommentsError::ParentNotFound(parent_id.clone()))?;

        if builder.commentable() != &parent.commentable {
            return Err(CommentsError::Validation(format!(
                "Reply must target {} like its parent",
                parent.commentable
            )));
        }

        self.create(builder.reply_to(parent_id.clone()))
    }

    /// Get a live comment
    pub fn find(&self, id: &CommentId) -> Option<&Comment> {
        self.table.get(id)
    }

    /// Get a comment, trashed or not
    pub fn find_with_trashed(&self, id: &CommentId) -> Option<&Comment> {
        self.table.get_with_trashed(id)
    }

    /// Fetch a live comment with its commenter loaded
    pub fn fetch(&self, id: &CommentId) -> Result<Loaded<U>> {
        let comment = self
            .table
            .get(id)
            .ok_or_else(|| CommentsError::CommentNotFound(id.clone()))?;
        self.load(comment)
    }

    /// Load the commenter for an already fetched comment
    pub fn load(&self, comment: &Comment) -> Result<Loaded<U>> {
        Ok(Loaded {
            commenter: self.commenter(comment)?,
            comment: comment.clone(),
        })
    }

    /// Load commenters for a list of comments, keeping its order
    pub fn load_all<'c>(
        &self,
        comments: impl IntoIterator<Item = &'c Comment>,
    ) -> Result<Vec<Loaded<U>>> {
        comments.into_iter().map(|c| self.load(c)).collect()
    }

    /// Apply fillable fields. Emits `updated` only when something changed.
    pub fn update(&mut self, id: &CommentId, fields: CommentFields) -> Result<Comment> {
        let mut updated = self
            .table
            .get(id)
            .cloned()
            .ok_or_else(|| CommentsError::CommentNotFound(id.clone()))?;

        if !updated.fill(&fields) {
            debug!(comment = %id, "update left comment unchanged");
            return Ok(updated);
        }

        if let Some(validator) = &self.validator {
            validator.validate(&updated)?;
        }

        self.store(updated.clone())?;
        info!(comment = %id, "comment updated");
        self.events.dispatch(EventKind::Updated, &updated);
        Ok(updated)
    }

    /// Soft- or hard-delete according to the configured policy
    pub fn delete(&mut self, id: &CommentId) -> Result<Comment> {
        if self.config.soft_deletes {
            self.soft_delete(id)
        } else {
            self.force_delete(id)
        }
    }

    /// Mark a live comment as deleted; reversible with `restore`
    pub fn soft_delete(&mut self, id: &CommentId) -> Result<Comment> {
        let mut trashed = self
            .table
            .get(id)
            .cloned()
            .ok_or_else(|| CommentsError::CommentNotFound(id.clone()))?;
        trashed.trash();

        self.store(trashed.clone())?;
        info!(comment = %id, "comment soft-deleted");
        self.events.dispatch(EventKind::Deleted, &trashed);
        Ok(trashed)
    }

    /// Bring a soft-deleted comment back
    pub fn restore(&mut self, id: &CommentId) -> Result<Comment> {
        let mut restored = self
            .table
            .get_scoped(id, Scope::OnlyTrashed)
            .cloned()
            .ok_or_else(|| CommentsError::CommentNotFound(id.clone()))?;
        restored.untrash();

        self.store(restored.clone())?;
        info!(comment = %id, "comment restored");
        self.events.dispatch(EventKind::Updated, &restored);
        Ok(restored)
    }

    /// Permanently remove a comment, trashed or not. Replies keep their
    /// parent link and resolve no parent afterwards.
    pub fn force_delete(&mut self, id: &CommentId) -> Result<Comment> {
        let removed = self
            .table
            .remove(id)
            .ok_or_else(|| CommentsError::CommentNotFound(id.clone()))?;

        info!(comment = %id, "comment force-deleted");
        self.events.dispatch(EventKind::Deleted, &removed);
        Ok(removed)
    }

    /// Registered author, or `None` for guest comments
    pub fn commenter(&self, comment: &Comment) -> Result<Option<U>> {
        match &comment.commenter {
            Some(commenter) => self.commenters.resolve(commenter),
            None => Ok(None),
        }
    }

    /// The content the comment is attached to
    pub fn commentable(&self, comment: &Comment) -> Result<Option<C>> {
        self.commentables.resolve(&comment.commentable)
    }

    /// Live direct replies to a comment
    pub fn children(&self, id: &CommentId) -> Vec<&Comment> {
        self.table.children(id, Scope::Default)
    }

    /// Live direct replies with their commenters loaded
    pub fn children_loaded(&self, id: &CommentId) -> Result<Vec<Loaded<U>>> {
        self.load_all(self.children(id))
    }

    /// The live comment this one replies to
    pub fn parent(&self, id: &CommentId) -> Option<&Comment> {
        self.table.parent(id)
    }

    /// Root of the thread containing `id`
    pub fn top_comment(&self, id: &CommentId) -> Result<&Comment> {
        self.table.top_comment(id)
    }

    /// Permalink under the configured base URL
    pub fn url(&self, comment: &Comment) -> String {
        comment.url(&self.config.base_url)
    }

    /// Reference to a comment under the configured model tag
    pub fn morph_ref(&self, comment: &Comment) -> MorphRef {
        comment.morph_ref(&self.config.model)
    }

    /// Write back a modified row; relation columns are unchanged
    fn store(&mut self, comment: Comment) -> Result<()> {
        let slot = self
            .table
            .get_mut(&comment.id)
            .ok_or_else(|| CommentsError::CommentNotFound(comment.id.clone()))?;
        *slot = comment;
        Ok(())
    }
}
