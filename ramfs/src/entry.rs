//! Entry records
//!
//! One [`Entry`] occupies one slot of the entry table. Directories carry an
//! ordered child list; files carry an optional content buffer.

use core_types::EntryId;
use hal::Buffer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file with byte content
    File,
    /// Directory with ordered children
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// A file or directory record
#[derive(Debug)]
pub struct Entry {
    pub(crate) name: String,
    pub(crate) kind: EntryKind,
    pub(crate) parent: EntryId,
    pub(crate) children: Vec<EntryId>,
    pub(crate) content: Option<Buffer>,
    pub(crate) size: usize,
}

impl Entry {
    /// Creates an empty entry under `parent`
    pub(crate) fn new(name: String, kind: EntryKind, parent: EntryId) -> Self {
        Self {
            name,
            kind,
            parent,
            children: Vec::new(),
            content: None,
            size: 0,
        }
    }

    /// Creates the root directory record
    pub(crate) fn root() -> Self {
        Self::new("/".to_string(), EntryKind::Directory, EntryId::ROOT)
    }

    /// Entry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry kind
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns true for directories
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Containing directory; the root is its own parent
    pub fn parent(&self) -> EntryId {
        self.parent
    }

    /// Child ids in insertion order (always empty for files)
    pub fn children(&self) -> &[EntryId] {
        &self.children
    }

    /// Valid content bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes allocated for content
    pub fn capacity(&self) -> usize {
        self.content.as_ref().map_or(0, |b| b.capacity())
    }

    /// The valid content bytes
    pub fn data(&self) -> &[u8] {
        match &self.content {
            Some(buffer) => &buffer.as_slice()[..self.size],
            None => &[],
        }
    }
}
