//! Unique identifiers for store entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of one slot in an entry table
///
/// Entry ids are plain table indices. They are stable for the lifetime of the
/// entry and are only handed out again after the entry is fully unlinked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(u32);

impl EntryId {
    /// The root directory. Always present, always its own parent.
    pub const ROOT: EntryId = EntryId(0);

    /// Creates an entry id from a raw table index
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw table index
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns the table index as a `usize`
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is the root id
    pub const fn is_root(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for EntryId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry:{}", self.0)
    }
}

/// Unique identifier for a store instance
///
/// Several stores can live in one process (tests do this constantly); log
/// entries carry the store id so their origin stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId(Uuid);

impl StoreId {
    /// Creates a new random store ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a store ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Store({})", self.0)
    }
}

/// File descriptor number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fd(pub u32);

impl Fd {
    /// Keyboard input, read-only
    pub const STDIN: Fd = Fd(0);
    /// Console output, write-only
    pub const STDOUT: Fd = Fd(1);
    /// Console output, write-only
    pub const STDERR: Fd = Fd(2);

    /// Returns true for descriptors 0, 1 and 2
    pub fn is_standard(&self) -> bool {
        self.0 <= 2
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fd{}", self.0)
    }
}
