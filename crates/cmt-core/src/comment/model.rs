//! Comment data models

use crate::error::CommentsError;
use crate::types::{CommentId, EntityKey, Extensions, MorphRef, MorphType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A comment attached to some commentable host entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CommentRow", try_from = "CommentRow")]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Comment body
    pub comment: String,
    /// Moderation flag
    pub approved: bool,
    /// Highlight flag
    pub is_featured: bool,
    /// Guest author name (no registered commenter)
    pub guest_name: Option<String>,
    /// Guest author email
    pub guest_email: Option<String>,
    /// Registered author, if any
    pub commenter: Option<MorphRef>,
    /// The content this comment is attached to
    pub commentable: MorphRef,
    /// The comment this one replies to. Stored in the `child_id` column.
    pub parent_id: Option<CommentId>,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
    /// Host extension columns
    pub extensions: Extensions,
}

impl Comment {
    /// Whether the comment is soft-deleted
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether this is a top-level comment on its commentable
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether the comment has no registered author
    pub fn is_guest(&self) -> bool {
        self.commenter.is_none()
    }

    /// Permalink of the form `<base>/comment/<id>`
    pub fn url(&self, base: &str) -> String {
        format!("{}/comment/{}", base.trim_end_matches('/'), self.id)
    }

    /// Reference to this comment as a polymorphic target, under the
    /// configured comment model tag
    pub fn morph_ref(&self, model: &str) -> MorphRef {
        MorphRef::new(model, self.id.0)
    }

    /// Label for display: the commenter reference, the guest name, or "anonymous"
    pub fn author_label(&self) -> String {
        match (&self.commenter, &self.guest_name) {
            (Some(commenter), _) => commenter.to_string(),
            (None, Some(name)) => name.clone(),
            (None, None) => "anonymous".to_string(),
        }
    }

    /// Reject extension keys that collide with a row column
    pub fn check_extensions(&self) -> crate::Result<()> {
        match self
            .extensions
            .data
            .keys()
            .find(|key| RESERVED_COLUMNS.contains(&key.as_str()))
        {
            Some(key) => Err(CommentsError::Validation(format!(
                "Extension key '{}' is a reserved column name",
                key
            ))),
            None => Ok(()),
        }
    }

    /// Apply the fillable fields. Returns whether anything changed; only
    /// then is `updated_at` refreshed.
    pub fn fill(&mut self, fields: &CommentFields) -> bool {
        let mut dirty = false;

        if let Some(comment) = &fields.comment {
            if &self.comment != comment {
                self.comment = comment.clone();
                dirty = true;
            }
        }
        if let Some(approved) = fields.approved {
            if self.approved != approved {
                self.approved = approved;
                dirty = true;
            }
        }
        if let Some(is_featured) = fields.is_featured {
            if self.is_featured != is_featured {
                self.is_featured = is_featured;
                dirty = true;
            }
        }
        if let Some(guest_name) = &fields.guest_name {
            if &self.guest_name != guest_name {
                self.guest_name = guest_name.clone();
                dirty = true;
            }
        }
        if let Some(guest_email) = &fields.guest_email {
            if &self.guest_email != guest_email {
                self.guest_email = guest_email.clone();
                dirty = true;
            }
        }

        if dirty {
            self.updated_at = Utc::now();
        }
        dirty
    }

    /// Mark as soft-deleted
    pub(crate) fn trash(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    /// Clear the soft-delete marker
    pub(crate) fn untrash(&mut self) {
        self.deleted_at = None;
        self.updated_at = Utc::now();
    }
}

/// The mass-assignable attribute set. Anything else in caller input
/// (ids, relation columns, timestamps) is dropped on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentFields {
    /// Comment body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Moderation flag
    #[serde(
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub approved: Option<bool>,
    /// Guest author name; `Some(None)` clears it
    #[serde(
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub guest_name: Option<Option<String>>,
    /// Guest author email; `Some(None)` clears it
    #[serde(
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub guest_email: Option<Option<String>>,
    /// Highlight flag
    #[serde(
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_featured: Option<bool>,
}

impl CommentFields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the fillable fields from arbitrary request input
    pub fn from_json(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Set the comment body
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the approval flag
    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    /// Set the featured flag
    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }

    /// Set the guest identity
    pub fn guest(mut self, name: impl Into<String>, email: Option<String>) -> Self {
        self.guest_name = Some(Some(name.into()));
        self.guest_email = Some(email);
        self
    }

    /// Clear the guest identity
    pub fn clear_guest(mut self) -> Self {
        self.guest_name = Some(None);
        self.guest_email = Some(None);
        self
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A present key yields `Some`, so an explicit `null` becomes `Some(None)`;
/// an absent key falls back to the field default.
fn deserialize_nullable<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Accepts `true`/`false`, `0`/`1` and their string forms, the way form
/// input and integer columns deliver booleans.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b)),
        Some(serde_json::Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(D::Error::custom(format!("invalid boolean flag: {}", n))),
        },
        Some(serde_json::Value::String(s)) => match s.as_str() {
            "1" | "true" | "on" => Ok(Some(true)),
            "0" | "false" | "off" | "" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("invalid boolean flag: {}", other))),
        },
        Some(other) => Err(D::Error::custom(format!("invalid boolean flag: {}", other))),
    }
}

/// Columns of the persisted row. Extension keys must not reuse them.
pub const RESERVED_COLUMNS: &[&str] = &[
    "id",
    "commenter_type",
    "commenter_id",
    "commentable_type",
    "commentable_id",
    "comment",
    "approved",
    "guest_name",
    "guest_email",
    "is_featured",
    "child_id",
    "created_at",
    "updated_at",
    "deleted_at",
];

/// Persisted row layout, one field per logical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: CommentId,
    #[serde(default)]
    pub commenter_type: Option<MorphType>,
    #[serde(default)]
    pub commenter_id: Option<EntityKey>,
    pub commentable_type: MorphType,
    pub commentable_id: EntityKey,
    pub comment: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub guest_email: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub child_id: Option<CommentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(flatten, default)]
    pub extensions: Extensions,
}

impl From<Comment> for CommentRow {
    fn from(c: Comment) -> Self {
        let (commenter_type, commenter_id) = match c.commenter {
            Some(r) => (Some(r.morph_type), Some(r.id)),
            None => (None, None),
        };

        CommentRow {
            id: c.id,
            commenter_type,
            commenter_id,
            commentable_type: c.commentable.morph_type,
            commentable_id: c.commentable.id,
            comment: c.comment,
            approved: c.approved,
            guest_name: c.guest_name,
            guest_email: c.guest_email,
            is_featured: c.is_featured,
            child_id: c.parent_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
            deleted_at: c.deleted_at,
            extensions: c.extensions,
        }
    }
}

impl TryFrom<CommentRow> for Comment {
    type Error = CommentsError;

    fn try_from(row: CommentRow) -> std::result::Result<Self, Self::Error> {
        let commenter = match (row.commenter_type, row.commenter_id) {
            (Some(morph_type), Some(id)) => Some(MorphRef { morph_type, id }),
            (None, None) => None,
            _ => {
                return Err(CommentsError::Validation(format!(
                    "Comment {}: commenter_type and commenter_id must be set together",
                    row.id
                )))
            }
        };

        Ok(Comment {
            id: row.id,
            comment: row.comment,
            approved: row.approved,
            is_featured: row.is_featured,
            guest_name: row.guest_name,
            guest_email: row.guest_email,
            commenter,
            commentable: MorphRef {
                morph_type: row.commentable_type,
                id: row.commentable_id,
            },
            parent_id: row.child_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
            extensions: row.extensions,
        })
    }
}
