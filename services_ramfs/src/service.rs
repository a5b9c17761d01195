//! RAMFS service implementation
//!
//! This module provides the service that maps path-based operations onto a
//! shared store.

use crate::operations::{DiskUsage, FileSystemOperations, ListingEntry, OperationError, StatInfo};
use core_types::EntryId;
use hal::{HeapAllocator, MemoryHal};
use ramfs::{EntryKind, FsError, PathResolver, RamFs, SharedRamFs};

/// The RAMFS service
///
/// Holds one handle to a shared store; clones of the handle held elsewhere
/// see the same tree and the same cursor.
#[derive(Debug)]
pub struct RamFsService<A: MemoryHal = HeapAllocator> {
    fs: SharedRamFs<A>,
}

impl<A: MemoryHal> Clone for RamFsService<A> {
    fn clone(&self) -> Self {
        Self {
            fs: self.fs.clone(),
        }
    }
}

impl RamFsService<HeapAllocator> {
    /// Creates a service over a fresh store
    pub fn new() -> Self {
        Self::with_store(SharedRamFs::default())
    }
}

impl Default for RamFsService<HeapAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: MemoryHal> RamFsService<A> {
    /// Creates a service over an existing store
    pub fn with_store(fs: SharedRamFs<A>) -> Self {
        Self { fs }
    }

    /// The underlying store handle
    pub fn store(&self) -> &SharedRamFs<A> {
        &self.fs
    }

    /// Resolves `path`, treating an empty path as the current directory
    fn target(fs: &RamFs<A>, path: &str) -> Result<EntryId, FsError> {
        if path.is_empty() {
            Ok(fs.current_dir())
        } else {
            fs.resolve(path)
        }
    }
}

impl<A: MemoryHal> FileSystemOperations for RamFsService<A> {
    fn ls(&self, path: &str) -> Result<Vec<ListingEntry>, OperationError> {
        let fs = self.fs.lock();
        let dir = Self::target(&fs, path)?;
        let children = fs.list_children(dir, fs.config().max_children)?;

        let mut listing = Vec::with_capacity(children.len());
        for id in children {
            let entry = fs.entry(id)?;
            listing.push(ListingEntry {
                id,
                name: entry.name().to_string(),
                kind: entry.kind(),
                size: entry.size(),
            });
        }
        Ok(listing)
    }

    fn stat(&self, path: &str) -> Result<StatInfo, OperationError> {
        let fs = self.fs.lock();
        let id = Self::target(&fs, path)?;
        let entry = fs.entry(id)?;

        Ok(StatInfo {
            id,
            name: entry.name().to_string(),
            kind: entry.kind(),
            size: entry.size(),
            capacity: entry.capacity(),
            entry_count: entry.is_directory().then(|| entry.children().len()),
            parent: entry.parent(),
            path: fs.full_path(id)?,
        })
    }

    fn mkdir(&mut self, path: &str) -> Result<EntryId, OperationError> {
        Ok(self.fs.with(|fs| fs.create_directory(path))?)
    }

    fn touch(&mut self, path: &str) -> Result<EntryId, OperationError> {
        Ok(self.fs.with(|fs| fs.create_file(path))?)
    }

    fn cat(&self, path: &str) -> Result<Vec<u8>, OperationError> {
        let fs = self.fs.lock();
        let id = fs.resolve(path)?;
        Ok(fs.read_to_vec(id)?)
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<EntryId, OperationError> {
        let mut fs = self.fs.lock();
        let id = match fs.resolve(path) {
            Ok(id) => id,
            Err(FsError::NotFound(_)) => fs.create_file(path)?,
            Err(e) => return Err(e.into()),
        };
        fs.write(id, bytes)?;
        Ok(id)
    }

    fn rm(&mut self, path: &str) -> Result<usize, OperationError> {
        let mut fs = self.fs.lock();
        let id = fs.resolve(path)?;
        Ok(fs.delete(id)?)
    }

    fn mv(&mut self, path: &str, new_name: &str) -> Result<(), OperationError> {
        let mut fs = self.fs.lock();
        let id = fs.resolve(path)?;
        fs.rename(id, PathResolver::creation_name(new_name))?;
        Ok(())
    }

    fn cp(&mut self, src: &str, dst: &str) -> Result<EntryId, OperationError> {
        let mut fs = self.fs.lock();
        let source = fs.resolve(src)?;
        let data = fs.read_to_vec(source)?;

        let target = fs.create_file(dst)?;
        if fs.entry(target)?.is_directory() {
            return Err(OperationError::InvalidOperation(format!(
                "cannot copy onto directory {}",
                dst
            )));
        }
        fs.write(target, &data)?;
        Ok(target)
    }

    fn find(&self, pattern: &str) -> Result<Vec<String>, OperationError> {
        let fs = self.fs.lock();
        let mut matches = Vec::new();
        for id in fs.walk(EntryId::ROOT)? {
            if id.is_root() {
                continue;
            }
            if fs.entry(id)?.name().contains(pattern) {
                matches.push(fs.full_path(id)?);
            }
        }
        Ok(matches)
    }

    fn du(&self, path: &str) -> Result<DiskUsage, OperationError> {
        let fs = self.fs.lock();
        let start = Self::target(&fs, path)?;

        let mut usage = DiskUsage::default();
        for id in fs.walk(start)? {
            let entry = fs.entry(id)?;
            match entry.kind() {
                EntryKind::File => {
                    usage.files += 1;
                    usage.bytes += entry.size();
                }
                EntryKind::Directory => usage.directories += 1,
            }
        }
        Ok(usage)
    }

    fn cd(&mut self, path: &str) -> Result<EntryId, OperationError> {
        let mut fs = self.fs.lock();
        let target = match path.trim() {
            "" => EntryId::ROOT,
            "." => fs.current_dir(),
            ".." => fs.entry(fs.current_dir())?.parent(),
            other => fs.resolve(other)?,
        };
        fs.change_directory(target)?;
        Ok(target)
    }

    fn pwd(&self) -> Result<String, OperationError> {
        let fs = self.fs.lock();
        Ok(fs.full_path(fs.current_dir())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ls_empty_path_lists_cursor() {
        let mut service = RamFsService::new();
        let docs = service.mkdir("docs").unwrap();
        service.cd("docs").unwrap();
        service.touch("a.txt").unwrap();

        let listing = service.ls("").unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "a.txt");
        assert_eq!(listing[0].kind, EntryKind::File);

        let root = service.ls("/").unwrap();
        assert_eq!(root[0].id, docs);
    }

    #[test]
    fn test_ls_on_file_fails() {
        let mut service = RamFsService::new();
        let file = service.touch("f").unwrap();
        assert_eq!(
            service.ls("f"),
            Err(OperationError::Fs(FsError::NotADirectory(file)))
        );
    }

    #[test]
    fn test_stat_reports_sizes() {
        let mut service = RamFsService::new();
        service.write("a.txt", b"hello").unwrap();

        let stat = service.stat("a.txt").unwrap();
        assert_eq!(stat.size, 5);
        assert_eq!(stat.capacity, 5 + 1024);
        assert_eq!(stat.entry_count, None);
        assert_eq!(stat.path, "/a.txt");

        let root = service.stat("/").unwrap();
        assert_eq!(root.entry_count, Some(1));
        assert_eq!(root.path, "/");
    }

    #[test]
    fn test_write_creates_then_reuses() {
        let mut service = RamFsService::new();
        let first = service.write("note", b"one").unwrap();
        let second = service.write("note", b"two").unwrap();
        assert_eq!(first, second);
        assert_eq!(service.cat("note").unwrap(), b"two");
    }

    #[test]
    fn test_cat_directory_fails() {
        let mut service = RamFsService::new();
        let dir = service.mkdir("d").unwrap();
        assert_eq!(
            service.cat("d"),
            Err(OperationError::Fs(FsError::NotAFile(dir)))
        );
    }

    #[test]
    fn test_mv_strips_leading_separator() {
        let mut service = RamFsService::new();
        let id = service.touch("old").unwrap();
        service.mv("old", "/new").unwrap();
        assert_eq!(service.stat("new").unwrap().id, id);
    }

    #[test]
    fn test_cp_copies_content() {
        let mut service = RamFsService::new();
        service.write("src", b"payload").unwrap();
        let copy = service.cp("src", "dst").unwrap();

        assert_eq!(service.cat("dst").unwrap(), b"payload");
        assert_ne!(copy, service.stat("src").unwrap().id);
    }

    #[test]
    fn test_cp_onto_directory_refused() {
        let mut service = RamFsService::new();
        service.write("src", b"x").unwrap();
        service.mkdir("dir").unwrap();
        assert!(matches!(
            service.cp("src", "dir"),
            Err(OperationError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_cd_dot_and_dotdot() {
        let mut service = RamFsService::new();
        let docs = service.mkdir("docs").unwrap();

        assert_eq!(service.cd("docs").unwrap(), docs);
        assert_eq!(service.cd(".").unwrap(), docs);
        assert_eq!(service.pwd().unwrap(), "/docs");
        assert_eq!(service.cd("..").unwrap(), EntryId::ROOT);
        assert_eq!(service.cd("..").unwrap(), EntryId::ROOT);

        service.cd("docs").unwrap();
        assert_eq!(service.cd("").unwrap(), EntryId::ROOT);
    }

    #[test]
    fn test_cd_into_file_fails() {
        let mut service = RamFsService::new();
        let file = service.touch("f").unwrap();
        assert_eq!(
            service.cd("f"),
            Err(OperationError::Fs(FsError::NotADirectory(file)))
        );
        assert_eq!(service.pwd().unwrap(), "/");
    }

    #[test]
    fn test_du_sums_subtree() {
        let mut service = RamFsService::new();
        service.mkdir("d").unwrap();
        service.cd("d").unwrap();
        service.write("a", b"1234").unwrap();
        service.write("b", b"56").unwrap();
        service.mkdir("sub").unwrap();
        service.cd("").unwrap();
        service.write("outside", b"ignored").unwrap();

        let usage = service.du("d").unwrap();
        assert_eq!(
            usage,
            DiskUsage {
                bytes: 6,
                files: 2,
                directories: 2
            }
        );
    }
}
