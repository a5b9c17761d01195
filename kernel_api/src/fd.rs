//! Descriptor table
//!
//! Descriptors 0, 1 and 2 are wired to the keyboard and console and never
//! appear here. Every other descriptor maps to one store entry, the entry's
//! slot generation at open time, and a byte offset.

use crate::error::SyscallError;
use core_types::{EntryId, Fd};
use std::collections::BTreeMap;

/// Descriptor numbers available per table, standard ones included
pub const MAX_FDS: usize = 256;

/// First descriptor handed out by [`FdTable::open`]
const FIRST_FILE_FD: u32 = 3;

/// An open file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    /// Entry the descriptor refers to
    pub entry: EntryId,
    /// Slot generation of `entry` when it was opened
    pub generation: u32,
    /// Position of the next read or write
    pub offset: usize,
}

/// Open descriptors of one syscall layer
#[derive(Debug, Default)]
pub struct FdTable {
    open: BTreeMap<u32, OpenFile>,
}

impl FdTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `entry` at offset 0 on the lowest free descriptor
    pub fn open(&mut self, entry: EntryId, generation: u32) -> Result<Fd, SyscallError> {
        let mut candidate = FIRST_FILE_FD;
        for taken in self.open.keys() {
            if *taken != candidate {
                break;
            }
            candidate += 1;
        }
        if candidate as usize >= MAX_FDS {
            return Err(SyscallError::TooManyOpenFiles { limit: MAX_FDS });
        }

        self.open.insert(
            candidate,
            OpenFile {
                entry,
                generation,
                offset: 0,
            },
        );
        Ok(Fd(candidate))
    }

    /// Looks up an open descriptor
    pub fn get(&self, fd: Fd) -> Result<&OpenFile, SyscallError> {
        self.open.get(&fd.0).ok_or(SyscallError::BadDescriptor(fd))
    }

    /// Looks up an open descriptor, mutably
    pub fn get_mut(&mut self, fd: Fd) -> Result<&mut OpenFile, SyscallError> {
        self.open.get_mut(&fd.0).ok_or(SyscallError::BadDescriptor(fd))
    }

    /// Closes a descriptor
    pub fn close(&mut self, fd: Fd) -> Result<OpenFile, SyscallError> {
        self.open.remove(&fd.0).ok_or(SyscallError::BadDescriptor(fd))
    }

    /// Number of open descriptors
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Returns true if nothing is open
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_descriptor_is_three() {
        let mut table = FdTable::new();
        assert_eq!(table.open(EntryId::new(1), 0).unwrap(), Fd(3));
        assert_eq!(table.open(EntryId::new(1), 0).unwrap(), Fd(4));
    }

    #[test]
    fn test_closed_descriptor_is_reused() {
        let mut table = FdTable::new();
        let a = table.open(EntryId::new(1), 0).unwrap();
        let b = table.open(EntryId::new(2), 0).unwrap();
        table.close(a).unwrap();

        assert_eq!(table.open(EntryId::new(3), 0).unwrap(), a);
        assert_eq!(table.get(b).unwrap().entry, EntryId::new(2));
    }

    #[test]
    fn test_generation_recorded() {
        let mut table = FdTable::new();
        let fd = table.open(EntryId::new(5), 3).unwrap();
        let open = table.get(fd).unwrap();
        assert_eq!(open.generation, 3);
        assert_eq!(open.offset, 0);
    }

    #[test]
    fn test_exhaustion() {
        let mut table = FdTable::new();
        for _ in 3..MAX_FDS {
            table.open(EntryId::new(1), 0).unwrap();
        }
        assert_eq!(
            table.open(EntryId::new(1), 0),
            Err(SyscallError::TooManyOpenFiles { limit: MAX_FDS })
        );
    }

    #[test]
    fn test_unknown_descriptor() {
        let mut table = FdTable::new();
        assert_eq!(table.close(Fd(9)), Err(SyscallError::BadDescriptor(Fd(9))));
        assert!(table.get(Fd(0)).is_err());
    }
}
