//! Comment entity module
//!
//! The comment model, the flat table it lives in, threading and the
//! service that runs lifecycle operations.

pub mod model;
pub mod table;
pub mod index;
pub mod validator;
pub mod builder;
pub mod thread;
mod service;

pub use model::*;
pub use table::{CommentTable, Scope};
pub use index::CommentIndex;
pub use validator::CommentValidator;
pub use builder::CommentBuilder;
pub use thread::{Thread, ThreadNode};
pub use service::{Comments, Loaded};
