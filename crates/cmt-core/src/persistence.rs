//! Comment table storage trait and file format

use crate::comment::CommentTable;
use crate::error::{CommentsError, Result};
use crate::types::ProtocolVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Stored table with schema version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFile {
    /// Schema version for migration
    pub schema_version: String,
    /// The comment rows
    pub comments: CommentTable,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TableFile {
    /// Create a new table file with current schema version
    pub fn new(comments: CommentTable) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            comments,
            extra: HashMap::new(),
        }
    }

    /// Get the table, consuming the file
    pub fn into_table(self) -> CommentTable {
        self.comments
    }

    /// Check the schema version and bring the file up to date
    pub fn migrate(mut self) -> Result<Self> {
        let version = ProtocolVersion::parse(&self.schema_version)
            .ok_or_else(|| CommentsError::UnsupportedSchemaVersion(self.schema_version.clone()))?;

        if !version.is_compatible(&ProtocolVersion::V1_0) {
            return Err(CommentsError::UnsupportedSchemaVersion(
                self.schema_version.clone(),
            ));
        }

        self.schema_version = CURRENT_SCHEMA_VERSION.to_string();
        Ok(self)
    }
}

/// Trait for comment table storage implementations
pub trait CommentStorage: Send + Sync {
    /// Load the table; an absent store loads as an empty table
    fn load(&self) -> Result<CommentTable>;

    /// Persist the whole table
    fn save(&self, table: &CommentTable) -> Result<()>;

    /// Check if anything has been stored yet
    fn exists(&self) -> bool;
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentBuilder;
    use crate::types::MorphRef;

    #[test]
    fn test_table_file_serialization() {
        let mut table = CommentTable::new();
        table
            .insert(CommentBuilder::on(MorphRef::new("Article", 1u64)).build())
            .unwrap();

        let json = serde_json::to_string(&TableFile::new(table)).unwrap();
        assert!(json.contains("\"schema_version\":\"1.0\""));
        assert!(json.contains("\"commentable_type\":\"Article\""));

        let file: TableFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file.migrate().unwrap().into_table().count(), 1);
    }

    #[test]
    fn test_migrate_minor_version() {
        let mut file = TableFile::new(CommentTable::new());
        file.schema_version = "1.3".to_string();
        assert_eq!(file.migrate().unwrap().schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_rejects_incompatible_version() {
        let mut file = TableFile::new(CommentTable::new());
        file.schema_version = "2.0".to_string();
        assert!(matches!(
            file.migrate(),
            Err(CommentsError::UnsupportedSchemaVersion(_))
        ));

        let mut file = TableFile::new(CommentTable::new());
        file.schema_version = "garbage".to_string();
        assert!(file.migrate().is_err());
    }
}
