//! Entry table
//!
//! A fixed-capacity arena of entry slots addressed by [`EntryId`]. Free slots
//! are tracked in an ordered set so allocation always hands out the lowest
//! free id, the same id a first-empty scan would find.
//!
//! Every slot also carries a generation that advances each time the slot is
//! released, so a holder of a stale id can tell a reused slot apart.

use crate::entry::Entry;
use crate::error::{FsError, FsResult};
use core_types::EntryId;
use std::collections::BTreeSet;

/// Fixed-capacity slot table
#[derive(Debug)]
pub struct EntryTable {
    slots: Vec<Option<Entry>>,
    generations: Vec<u32>,
    free: BTreeSet<u32>,
}

impl EntryTable {
    /// Creates a table of `capacity` slots with the root installed at id 0
    ///
    /// `capacity` must be at least 1 and at most
    /// [`MAX_TABLE_ENTRIES`](crate::MAX_TABLE_ENTRIES); the store validates
    /// this through its configuration.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.push(Some(Entry::root()));
        slots.resize_with(capacity, || None);

        let free = (1..capacity).filter_map(|i| u32::try_from(i).ok()).collect();

        Self {
            slots,
            generations: vec![0; capacity],
            free,
        }
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries, root included
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always false: the root is permanent
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `id` addresses a live entry
    pub fn is_used(&self, id: EntryId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    /// Stores `entry` in the lowest free slot
    pub fn allocate_slot(&mut self, entry: Entry) -> FsResult<EntryId> {
        let raw = self.free.pop_first().ok_or(FsError::TableFull {
            capacity: self.slots.len(),
        })?;
        self.slots[raw as usize] = Some(entry);
        Ok(EntryId::new(raw))
    }

    /// Returns the lowest free id without taking it
    pub fn peek_free(&self) -> Option<EntryId> {
        self.free.first().copied().map(EntryId::new)
    }

    /// Generation of a live entry's slot
    pub fn generation(&self, id: EntryId) -> FsResult<u32> {
        self.get(id)?;
        Ok(self.generations[id.index()])
    }

    /// Looks up a live entry
    pub fn get(&self, id: EntryId) -> FsResult<&Entry> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(FsError::InvalidId(id))
    }

    /// Looks up a live entry, mutably
    pub fn get_mut(&mut self, id: EntryId) -> FsResult<&mut Entry> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(FsError::InvalidId(id))
    }

    /// Removes an entry and returns its slot to the free list
    ///
    /// The caller must already have unlinked it from its parent. The root
    /// cannot be released.
    pub(crate) fn release(&mut self, id: EntryId) -> FsResult<Entry> {
        if id.is_root() {
            return Err(FsError::CannotDeleteRoot);
        }
        let entry = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(FsError::InvalidId(id))?;
        let generation = &mut self.generations[id.index()];
        *generation = generation.wrapping_add(1);
        self.free.insert(id.as_u32());
        Ok(entry)
    }

    /// Iterates live entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Entry)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .map(|entry| (EntryId::new(i as u32), entry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;

    fn file(name: &str) -> Entry {
        Entry::new(name.to_string(), EntryKind::File, EntryId::ROOT)
    }

    #[test]
    fn test_new_table_has_root() {
        let table = EntryTable::new(8);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 1);
        assert!(table.is_used(EntryId::ROOT));
        assert_eq!(table.get(EntryId::ROOT).unwrap().name(), "/");
    }

    #[test]
    fn test_allocate_lowest_free_slot() {
        let mut table = EntryTable::new(8);
        assert_eq!(table.allocate_slot(file("a")).unwrap(), EntryId::new(1));
        assert_eq!(table.allocate_slot(file("b")).unwrap(), EntryId::new(2));
        assert_eq!(table.allocate_slot(file("c")).unwrap(), EntryId::new(3));

        table.release(EntryId::new(2)).unwrap();
        assert_eq!(table.peek_free(), Some(EntryId::new(2)));
        assert_eq!(table.allocate_slot(file("d")).unwrap(), EntryId::new(2));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_table_full() {
        let mut table = EntryTable::new(3);
        table.allocate_slot(file("a")).unwrap();
        table.allocate_slot(file("b")).unwrap();

        let result = table.allocate_slot(file("c"));
        assert_eq!(result.unwrap_err(), FsError::TableFull { capacity: 3 });
        assert_eq!(table.peek_free(), None);
    }

    #[test]
    fn test_out_of_range_and_free_ids_rejected() {
        let table = EntryTable::new(4);
        assert_eq!(
            table.get(EntryId::new(99)).unwrap_err(),
            FsError::InvalidId(EntryId::new(99))
        );
        assert_eq!(
            table.get(EntryId::new(2)).unwrap_err(),
            FsError::InvalidId(EntryId::new(2))
        );
        assert!(!table.is_used(EntryId::new(99)));
    }

    #[test]
    fn test_root_cannot_be_released() {
        let mut table = EntryTable::new(4);
        assert_eq!(
            table.release(EntryId::ROOT).unwrap_err(),
            FsError::CannotDeleteRoot
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_double_release_rejected() {
        let mut table = EntryTable::new(4);
        let id = table.allocate_slot(file("a")).unwrap();
        table.release(id).unwrap();
        assert_eq!(table.release(id).unwrap_err(), FsError::InvalidId(id));
    }

    #[test]
    fn test_release_advances_generation() {
        let mut table = EntryTable::new(4);
        let id = table.allocate_slot(file("a")).unwrap();
        let before = table.generation(id).unwrap();

        table.release(id).unwrap();
        assert_eq!(table.generation(id).unwrap_err(), FsError::InvalidId(id));

        let reused = table.allocate_slot(file("b")).unwrap();
        assert_eq!(reused, id);
        assert_eq!(table.generation(reused).unwrap(), before + 1);
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut table = EntryTable::new(6);
        table.allocate_slot(file("a")).unwrap();
        table.allocate_slot(file("b")).unwrap();
        let names: Vec<&str> = table.iter().map(|(_, e)| e.name()).collect();
        assert_eq!(names, vec!["/", "a", "b"]);
    }
}
