//! File system storage for the comment table

use cmt_core::error::{CommentsError, Result};
use cmt_core::{CommentStorage, CommentTable, TableFile, CURRENT_SCHEMA_VERSION};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the table file inside the storage directory
pub const TABLE_FILE_NAME: &str = "comments.json";

/// File system based comment storage: one JSON file holding every row
pub struct FileSystemStorage {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Table file path
    table_path: PathBuf,
}

impl FileSystemStorage {
    /// Create a new file system storage rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let table_path = base_dir.join(TABLE_FILE_NAME);

        let storage = Self {
            base_dir,
            table_path,
        };

        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage with default directory (platform data dir, or ~/.cmt)
    pub fn default_location() -> Result<Self> {
        let base_dir = directories::ProjectDirs::from("com", "cmt", "cmt")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".cmt")
            });

        Self::new(base_dir)
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                CommentsError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create storage directory: {}", e),
                ))
            })?;
            debug!("Created storage directory: {:?}", self.base_dir);
        }
        Ok(())
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self) -> PathBuf {
        self.base_dir.join(format!(".{}.tmp", TABLE_FILE_NAME))
    }

    /// Write the table atomically (write to temp, then rename)
    fn atomic_write(&self, table: &CommentTable) -> Result<()> {
        let temp_path = self.temp_path();
        let file = TableFile::new(table.clone());

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            CommentsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;

        // Rename to final path (atomic on most filesystems)
        fs::rename(&temp_path, &self.table_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CommentsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved {} comments to {:?}", table.count(), self.table_path);
        Ok(())
    }

    /// Read and parse the table file
    fn read_table(&self, path: &Path) -> Result<CommentTable> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No table at {:?}, starting empty", path);
                return Ok(CommentTable::new());
            }
            Err(e) => return Err(CommentsError::Io(e)),
        };

        let reader = BufReader::new(file);
        let table_file: TableFile = serde_json::from_reader(reader)
            .map_err(|e| CommentsError::from(e).with_context(format!("Reading {}", path.display())))?;

        if table_file.schema_version != CURRENT_SCHEMA_VERSION {
            info!(
                "Migrating comment table from version {} to {}",
                table_file.schema_version, CURRENT_SCHEMA_VERSION
            );
        }

        Ok(table_file.migrate()?.into_table())
    }

    /// Get base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get table file path
    pub fn table_path(&self) -> &PathBuf {
        &self.table_path
    }
}

impl CommentStorage for FileSystemStorage {
    fn load(&self) -> Result<CommentTable> {
        self.read_table(&self.table_path)
    }

    fn save(&self, table: &CommentTable) -> Result<()> {
        self.atomic_write(table)
    }

    fn exists(&self) -> bool {
        self.table_path.exists()
    }
}
