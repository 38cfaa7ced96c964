//! cmt-storage - Storage library for cmt
//!
//! This crate provides file-backed storage for the comment table.

mod table_store;

pub use table_store::{FileSystemStorage, TABLE_FILE_NAME};
