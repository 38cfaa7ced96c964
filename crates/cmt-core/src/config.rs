//! Configuration for cmt

use crate::error::{CommentsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// Morph type tag of the comment model
    pub model: String,
    /// Cascade with soft deletes (true) or hard deletes (false), and the
    /// behavior of a plain `delete`
    pub soft_deletes: bool,
    /// Approval state of new comments that do not set one
    pub approved_by_default: bool,
    /// Base URL for permalinks
    pub base_url: String,
    /// Validation policy
    pub validation: ValidationConfig,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            model: "comment".to_string(),
            soft_deletes: true,
            approved_by_default: false,
            base_url: "http://localhost".to_string(),
            validation: ValidationConfig::default(),
        }
    }
}

impl CommentsConfig {
    /// Load from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CommentsError::Config(format!("{}: {}", path.display(), e)))?;
        config.check()?;
        Ok(config)
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject settings that cannot work
    pub fn check(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(CommentsError::Config("model must not be empty".to_string()));
        }
        if self.validation.max_comment_length == 0 {
            return Err(CommentsError::Config(
                "validation.max_comment_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validation-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum comment content length
    pub max_comment_length: usize,
    /// Guest comments must carry a name
    pub require_guest_name: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_comment_length: crate::comment::validator::MAX_COMMENT_LENGTH,
            require_guest_name: true,
        }
    }
}
