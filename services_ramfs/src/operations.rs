//! Filesystem operations
//!
//! This module defines the operations provided by the RAMFS service.

use core_types::EntryId;
use ramfs::{EntryKind, FsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during filesystem operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    /// The store refused the operation
    #[error(transparent)]
    Fs(#[from] FsError),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// One line of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Entry id
    pub id: EntryId,
    /// Entry name
    pub name: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Content size in bytes (0 for directories)
    pub size: usize,
}

/// Metadata information about an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatInfo {
    /// Entry id
    pub id: EntryId,
    /// Entry name
    pub name: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Valid content bytes
    pub size: usize,
    /// Allocated content bytes
    pub capacity: usize,
    /// Child count (for directories)
    pub entry_count: Option<usize>,
    /// Containing directory
    pub parent: EntryId,
    /// Absolute path
    pub path: String,
}

/// Space used by a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    /// Sum of file sizes
    pub bytes: usize,
    /// Number of files
    pub files: usize,
    /// Number of directories, the starting one included
    pub directories: usize,
}

/// Filesystem operations trait
///
/// Paths are resolved against the store's current directory unless they
/// start with `/`. Creation is flat: the path minus its leading separators
/// becomes one name in the current directory.
pub trait FileSystemOperations {
    /// List directory contents
    ///
    /// An empty path lists the current directory.
    fn ls(&self, path: &str) -> Result<Vec<ListingEntry>, OperationError>;

    /// Get entry metadata
    fn stat(&self, path: &str) -> Result<StatInfo, OperationError>;

    /// Create a directory in the current directory
    fn mkdir(&mut self, path: &str) -> Result<EntryId, OperationError>;

    /// Create an empty file in the current directory
    fn touch(&mut self, path: &str) -> Result<EntryId, OperationError>;

    /// Read a whole file
    fn cat(&self, path: &str) -> Result<Vec<u8>, OperationError>;

    /// Replace a file's content, creating the file when missing
    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<EntryId, OperationError>;

    /// Delete an entry and everything below it
    ///
    /// Returns the number of entries removed.
    fn rm(&mut self, path: &str) -> Result<usize, OperationError>;

    /// Rename an entry in place
    fn mv(&mut self, path: &str, new_name: &str) -> Result<(), OperationError>;

    /// Copy a file's content into a new entry in the current directory
    fn cp(&mut self, src: &str, dst: &str) -> Result<EntryId, OperationError>;

    /// Full paths of every entry whose name contains `pattern`
    fn find(&self, pattern: &str) -> Result<Vec<String>, OperationError>;

    /// Space used at and below `path`
    fn du(&self, path: &str) -> Result<DiskUsage, OperationError>;

    /// Move the current directory
    ///
    /// `".."` goes to the parent, `"."` stays, an empty path goes to root.
    fn cd(&mut self, path: &str) -> Result<EntryId, OperationError>;

    /// Absolute path of the current directory
    fn pwd(&self) -> Result<String, OperationError>;
}
