//! Store error types

use crate::config::ConfigError;
use core_types::EntryId;
use hal::MemoryError;
use thiserror::Error;

/// Errors returned by store operations
///
/// A failed operation never leaves the tree in a state that violates the
/// store invariants; every check happens before the first mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsError {
    /// Id outside the table, or a free slot
    #[error("Invalid entry id: {0}")]
    InvalidId(EntryId),

    /// No free slot left for a new entry
    #[error("Entry table full ({capacity} entries)")]
    TableFull { capacity: usize },

    /// Path resolution failed
    #[error("File not found: {0}")]
    NotFound(String),

    /// Operation needs a directory
    #[error("Not a directory: {0}")]
    NotADirectory(EntryId),

    /// Operation needs a file
    #[error("Not a file: {0}")]
    NotAFile(EntryId),

    /// The root directory is permanent
    #[error("Cannot delete the root directory")]
    CannotDeleteRoot,

    /// The root directory keeps its name
    #[error("Cannot rename the root directory")]
    CannotRenameRoot,

    /// The directory already holds its maximum number of children
    #[error("Directory {dir} is full ({limit} children)")]
    CapacityExceeded { dir: EntryId, limit: usize },

    /// Name is empty or otherwise unusable
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// A sibling already uses the name
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The raw allocator refused the request
    #[error("Allocation failed: {0}")]
    Allocation(#[from] MemoryError),

    /// The store configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An integrity check found a broken invariant
    #[error("Store corrupted: {0}")]
    Corrupted(String),
}

/// Result type for store operations
pub type FsResult<T> = Result<T, FsError>;
