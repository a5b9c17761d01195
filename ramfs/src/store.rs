//! The RAMFS store
//!
//! [`RamFs`] bundles the entry table, the current-directory cursor, the raw
//! allocator that backs file content, and the store's logger. Every operation
//! takes the store explicitly; there is no process-wide state.

use crate::config::{RamFsConfig, WritePolicy};
use crate::entry::{Entry, EntryKind};
use crate::error::{FsError, FsResult};
use crate::path::PathResolver;
use crate::table::EntryTable;
use core_types::{EntryId, StoreId};
use hal::{HeapAllocator, MemoryHal, MemoryStats};
use services_logger::{LogEntry, LogLevel, Logger};

const COMPONENT: &str = "ramfs";

/// In-memory hierarchical file store
#[derive(Debug)]
pub struct RamFs<A: MemoryHal = HeapAllocator> {
    id: StoreId,
    config: RamFsConfig,
    table: EntryTable,
    cursor: EntryId,
    allocator: A,
    log: Logger,
}

impl RamFs<HeapAllocator> {
    /// Creates a root-only store with default limits
    pub fn new() -> Self {
        let config = RamFsConfig::default();
        Self::build(config, HeapAllocator::new())
    }

    /// Creates a root-only store with the given limits
    pub fn with_config(config: RamFsConfig) -> FsResult<Self> {
        Self::with_allocator(config, HeapAllocator::new())
    }
}

impl Default for RamFs<HeapAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: MemoryHal> RamFs<A> {
    /// Creates a root-only store that draws content buffers from `allocator`
    pub fn with_allocator(config: RamFsConfig, allocator: A) -> FsResult<Self> {
        config.validate()?;
        Ok(Self::build(config, allocator))
    }

    fn build(config: RamFsConfig, allocator: A) -> Self {
        let id = StoreId::new();
        let mut log = Logger::new(config.log_capacity);
        log.record(
            LogEntry::new(LogLevel::Info, COMPONENT, "store initialized")
                .with_source(id)
                .with_field("max_entries", config.max_entries),
        );

        Self {
            id,
            table: EntryTable::new(config.max_entries),
            cursor: EntryId::ROOT,
            allocator,
            log,
            config,
        }
    }

    /// Store identity
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Active limits
    pub fn config(&self) -> &RamFsConfig {
        &self.config
    }

    /// Read-only view of the entry table
    pub fn table(&self) -> &EntryTable {
        &self.table
    }

    /// The allocator backing file content
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Allocation counters of the backing allocator
    pub fn memory_stats(&self) -> MemoryStats {
        self.allocator.stats()
    }

    /// The store's log
    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// The store's log, mutably (level and enable switches)
    pub fn log_mut(&mut self) -> &mut Logger {
        &mut self.log
    }

    /// Looks up a live entry
    pub fn entry(&self, id: EntryId) -> FsResult<&Entry> {
        self.table.get(id)
    }

    /// Slot generation of a live entry
    ///
    /// Changes once the entry is deleted, so `(id, generation)` names one
    /// entry for the lifetime of the store even after its id is reused.
    pub fn generation(&self, id: EntryId) -> FsResult<u32> {
        self.table.generation(id)
    }

    /// Number of live entries, root included
    pub fn entry_count(&self) -> usize {
        self.table.len()
    }

    /// The current-directory cursor
    pub fn current_dir(&self) -> EntryId {
        self.cursor
    }

    /// Moves the cursor to `id`, which must be a directory
    pub fn change_directory(&mut self, id: EntryId) -> FsResult<()> {
        if !self.table.get(id)?.is_directory() {
            return Err(FsError::NotADirectory(id));
        }
        self.cursor = id;
        self.note(LogLevel::Debug, "cursor moved", Some(id));
        Ok(())
    }

    /// Resolves a path against the root or the cursor
    pub fn resolve(&self, path: &str) -> FsResult<EntryId> {
        PathResolver::resolve(&self.table, self.cursor, path)
    }

    /// Alias of [`RamFs::resolve`]
    pub fn find_path(&self, path: &str) -> FsResult<EntryId> {
        self.resolve(path)
    }

    /// Creates a file in the current directory, or returns the existing entry
    ///
    /// The path is not split into segments: leading separators are stripped
    /// and the remainder becomes the name, so `"a/b"` names one entry.
    pub fn create_file(&mut self, path: &str) -> FsResult<EntryId> {
        self.create(path, EntryKind::File)
    }

    /// Creates a directory in the current directory, or returns the existing entry
    pub fn create_directory(&mut self, path: &str) -> FsResult<EntryId> {
        self.create(path, EntryKind::Directory)
    }

    fn create(&mut self, path: &str, kind: EntryKind) -> FsResult<EntryId> {
        let name = self.normalize_name(PathResolver::creation_name(path), path)?;
        let parent = self.cursor;

        if let Some(existing) = PathResolver::find_child(&self.table, parent, &name) {
            return Ok(existing);
        }

        let siblings = self.table.get(parent)?.children.len();
        if siblings >= self.config.max_children {
            self.note(LogLevel::Warn, "directory full", Some(parent));
            return Err(FsError::CapacityExceeded {
                dir: parent,
                limit: self.config.max_children,
            });
        }

        let id = match self.table.allocate_slot(Entry::new(name, kind, parent)) {
            Ok(id) => id,
            Err(e) => {
                self.note(LogLevel::Warn, "entry table full", None);
                return Err(e);
            }
        };
        self.table.get_mut(parent)?.children.push(id);

        self.note(LogLevel::Debug, format!("created {}", kind), Some(id));
        Ok(id)
    }

    /// Truncates a name to the configured length and rejects empty names
    fn normalize_name(&self, name: &str, original: &str) -> FsResult<String> {
        let name = match name.char_indices().nth(self.config.max_name_len) {
            Some((idx, _)) => &name[..idx],
            None => name,
        };
        if name.is_empty() {
            return Err(FsError::InvalidName(original.to_string()));
        }
        Ok(name.to_string())
    }

    /// Replaces a file's content
    ///
    /// A fresh buffer of `bytes.len() + write_slack` bytes is requested for
    /// every write. If the allocation fails the old content stays in place.
    pub fn write(&mut self, id: EntryId, bytes: &[u8]) -> FsResult<()> {
        if self.table.get(id)?.is_directory() {
            return Err(FsError::NotAFile(id));
        }

        let requested = bytes.len().saturating_add(self.config.write_slack);
        let mut buffer = match self.allocator.allocate(requested) {
            Ok(buffer) => buffer,
            Err(e) => {
                self.note(LogLevel::Warn, "content allocation failed", Some(id));
                return Err(e.into());
            }
        };
        buffer.as_mut_slice()[..bytes.len()].copy_from_slice(bytes);

        let entry = self.table.get_mut(id)?;
        let previous = entry.content.replace(buffer);
        entry.size = bytes.len();

        if let Some(old) = previous {
            match self.config.write_policy {
                WritePolicy::ReleaseOnReplace => {
                    if let Err(e) = self.allocator.release(old) {
                        self.note(LogLevel::Error, format!("release failed: {}", e), Some(id));
                    }
                }
                WritePolicy::LegacyLeak => {
                    // The allocator keeps counting the old buffer as live.
                    drop(old);
                    self.note(LogLevel::Warn, "previous buffer leaked", Some(id));
                }
            }
        }

        self.log.record(
            LogEntry::new(LogLevel::Debug, COMPONENT, "content written")
                .with_source(self.id)
                .with_field("id", id.as_u32())
                .with_field("size", bytes.len()),
        );
        Ok(())
    }

    /// Copies up to `buf.len()` bytes of a file's content into `buf`
    ///
    /// Returns the number of bytes copied.
    pub fn read(&self, id: EntryId, buf: &mut [u8]) -> FsResult<usize> {
        let entry = self.table.get(id)?;
        if entry.is_directory() {
            return Err(FsError::NotAFile(id));
        }
        let data = entry.data();
        let count = buf.len().min(data.len());
        buf[..count].copy_from_slice(&data[..count]);
        Ok(count)
    }

    /// Returns a copy of a file's whole content
    pub fn read_to_vec(&self, id: EntryId) -> FsResult<Vec<u8>> {
        let entry = self.table.get(id)?;
        if entry.is_directory() {
            return Err(FsError::NotAFile(id));
        }
        Ok(entry.data().to_vec())
    }

    /// Deletes an entry and everything beneath it
    ///
    /// Descendants go first, so an interrupted delete leaves a smaller subtree
    /// rather than a dangling link. Returns the number of entries removed.
    pub fn delete(&mut self, id: EntryId) -> FsResult<usize> {
        if id.is_root() {
            return Err(FsError::CannotDeleteRoot);
        }
        self.table.get(id)?;

        let doomed = self.post_order(id)?;
        let mut cursor_reset = false;

        for victim in &doomed {
            let parent = self.table.get(*victim)?.parent;
            if let Ok(parent_entry) = self.table.get_mut(parent) {
                parent_entry.children.retain(|child| child != victim);
            }

            let entry = self.table.release(*victim)?;
            if let Some(buffer) = entry.content {
                if let Err(e) = self.allocator.release(buffer) {
                    self.note(LogLevel::Error, format!("release failed: {}", e), Some(*victim));
                }
            }

            if self.cursor == *victim {
                self.cursor = EntryId::ROOT;
                cursor_reset = true;
            }
        }

        self.log.record(
            LogEntry::new(LogLevel::Info, COMPONENT, "deleted")
                .with_source(self.id)
                .with_field("id", id.as_u32())
                .with_field("entries", doomed.len()),
        );
        if cursor_reset {
            self.note(LogLevel::Debug, "cursor reset to root", Some(EntryId::ROOT));
        }

        Ok(doomed.len())
    }

    /// Renames an entry in place
    ///
    /// The name is truncated like a created name. Renaming onto a sibling's
    /// name is refused, as is renaming the root.
    pub fn rename(&mut self, id: EntryId, new_name: &str) -> FsResult<()> {
        let entry = self.table.get(id)?;
        if id.is_root() {
            return Err(FsError::CannotRenameRoot);
        }
        let parent = entry.parent;
        let current = entry.name.clone();

        let name = self.normalize_name(new_name, new_name)?;
        if name == current {
            return Ok(());
        }
        if PathResolver::find_child(&self.table, parent, &name).is_some() {
            return Err(FsError::AlreadyExists(name));
        }

        self.table.get_mut(id)?.name = name;
        self.note(LogLevel::Debug, "renamed", Some(id));
        Ok(())
    }

    /// Returns up to `max_count` child ids of a directory, in insertion order
    pub fn list_children(&self, dir: EntryId, max_count: usize) -> FsResult<Vec<EntryId>> {
        let entry = self.table.get(dir)?;
        if !entry.is_directory() {
            return Err(FsError::NotADirectory(dir));
        }
        Ok(entry.children.iter().take(max_count).copied().collect())
    }

    /// Renders the absolute path of an entry
    ///
    /// At most `max_path_depth` ancestors are followed and the result never
    /// exceeds `max_path_len` bytes; anything beyond either limit is dropped.
    pub fn full_path(&self, id: EntryId) -> FsResult<String> {
        self.table.get(id)?;
        if id.is_root() {
            return Ok("/".to_string());
        }

        let mut components = Vec::new();
        let mut current = id;
        while !current.is_root() && components.len() < self.config.max_path_depth {
            let entry = self.table.get(current)?;
            components.push(entry.name());
            current = entry.parent;
        }

        let mut path = String::from("/");
        for (i, name) in components.iter().rev().enumerate() {
            let separator = usize::from(i > 0);
            if path.len() + separator + name.len() > self.config.max_path_len {
                break;
            }
            if i > 0 {
                path.push('/');
            }
            path.push_str(name);
        }
        Ok(path)
    }

    /// Returns `id` and every entry below it, parents before children,
    /// siblings in insertion order
    pub fn walk(&self, id: EntryId) -> FsResult<Vec<EntryId>> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if order.len() >= self.table.capacity() {
                return Err(FsError::Corrupted(format!("cycle below {}", id)));
            }
            order.push(current);
            stack.extend(self.table.get(current)?.children.iter().rev().copied());
        }
        Ok(order)
    }

    /// Every entry below and including `id`, children before parents
    fn post_order(&self, id: EntryId) -> FsResult<Vec<EntryId>> {
        let mut order = self.walk(id)?;
        order.reverse();
        Ok(order)
    }

    /// Checks every tree invariant
    ///
    /// Meant for tests and diagnostics; walks the whole table.
    pub fn verify_integrity(&self) -> FsResult<()> {
        let root = self.table.get(EntryId::ROOT)?;
        if !root.is_directory() || root.name() != "/" || root.parent() != EntryId::ROOT {
            return Err(FsError::Corrupted("root record damaged".to_string()));
        }

        for (id, entry) in self.table.iter() {
            if entry.name().is_empty() {
                return Err(FsError::Corrupted(format!("{} has an empty name", id)));
            }
            if entry.size() > entry.capacity() {
                return Err(FsError::Corrupted(format!("{} size exceeds capacity", id)));
            }
            if entry.is_directory() {
                if entry.children().len() > self.config.max_children {
                    return Err(FsError::Corrupted(format!("{} has too many children", id)));
                }
                for child in entry.children() {
                    let child_entry = self.table.get(*child).map_err(|_| {
                        FsError::Corrupted(format!("{} lists free slot {}", id, child))
                    })?;
                    if child_entry.parent() != id {
                        return Err(FsError::Corrupted(format!(
                            "{} lists {} but it points elsewhere",
                            id, child
                        )));
                    }
                }
            } else if !entry.children().is_empty() {
                return Err(FsError::Corrupted(format!("file {} has children", id)));
            }

            if id.is_root() {
                continue;
            }
            let parent = self.table.get(entry.parent()).map_err(|_| {
                FsError::Corrupted(format!("{} has a free parent slot", id))
            })?;
            let links = parent.children().iter().filter(|c| **c == id).count();
            if !parent.is_directory() || links != 1 {
                return Err(FsError::Corrupted(format!(
                    "{} is linked {} times from its parent",
                    id, links
                )));
            }
        }

        let reachable = self.walk(EntryId::ROOT)?.len();
        if reachable != self.table.len() {
            return Err(FsError::Corrupted(format!(
                "{} entries live but {} reachable",
                self.table.len(),
                reachable
            )));
        }

        if !self.table.get(self.cursor)?.is_directory() {
            return Err(FsError::Corrupted("cursor is not a directory".to_string()));
        }
        Ok(())
    }

    fn note(&mut self, level: LogLevel, message: impl Into<String>, id: Option<EntryId>) {
        let mut entry = LogEntry::new(level, COMPONENT, message).with_source(self.id);
        if let Some(id) = id {
            entry = entry.with_field("id", id.as_u32());
        }
        self.log.record(entry);
    }
}
