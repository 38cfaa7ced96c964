//! cmt-core - Core library for cmt
//!
//! Polymorphic, threaded comments for host applications: a comment entity
//! attachable to any content type, nested replies, moderation flags, guest
//! authorship, lifecycle notifications and cascade cleanup when content is
//! deleted.
//!
//! # Example
//!
//! ```ignore
//! use cmt_core::{CommentBuilder, Comments, CommentsConfig, Commentable};
//!
//! let mut comments: Comments = Comments::new(CommentsConfig::default());
//! let root = comments.create(CommentBuilder::on(article.morph_ref()).content("First!"))?;
//! comments.reply(&root.id, CommentBuilder::on(article.morph_ref()).guest("Jane", None))?;
//!
//! let visible = article.approved_comments(&comments);
//! comments.delete_commentable(&article, |a| articles.delete(a))?;
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod morph;
pub mod comment;
pub mod commentable;
pub mod events;
pub mod persistence;

pub use error::{CommentsError, Result};
pub use types::*;
pub use config::{CommentsConfig, ValidationConfig};
pub use morph::{Morph, MorphRegistry};
pub use comment::{
    Comment, CommentBuilder, CommentFields, CommentTable, CommentValidator, Comments, Loaded,
    Scope, Thread, ThreadNode,
};
pub use commentable::{CascadeMode, CascadeReport, Commentable};
pub use events::{CommentEvent, CommentListener, EventDispatcher, EventKind, EventLog};
pub use persistence::{CommentStorage, TableFile, CURRENT_SCHEMA_VERSION};
