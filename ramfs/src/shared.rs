//! Shared store handle
//!
//! Callers that need one store from several places (the service layer, the
//! syscall layer, the shell) hold a [`SharedRamFs`]. Each operation runs under
//! the lock, so operations are serialized.

use crate::store::RamFs;
use hal::{HeapAllocator, MemoryHal};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Reference-counted, lock-protected store
#[derive(Debug)]
pub struct SharedRamFs<A: MemoryHal = HeapAllocator> {
    inner: Arc<Mutex<RamFs<A>>>,
}

impl<A: MemoryHal> Clone for SharedRamFs<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: MemoryHal> SharedRamFs<A> {
    /// Wraps a store
    pub fn new(fs: RamFs<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(fs)),
        }
    }

    /// Locks the store
    ///
    /// A panic while the lock was held does not make the store unusable;
    /// every mutation checks before it changes anything.
    pub fn lock(&self) -> MutexGuard<'_, RamFs<A>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with the store locked
    pub fn with<R>(&self, f: impl FnOnce(&mut RamFs<A>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}

impl Default for SharedRamFs<HeapAllocator> {
    fn default() -> Self {
        Self::new(RamFs::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::EntryId;
    use std::thread;

    #[test]
    fn test_clones_share_one_store() {
        let shared = SharedRamFs::default();
        let other = shared.clone();

        let id = shared.with(|fs| fs.create_file("a")).unwrap();
        assert_eq!(other.lock().resolve("a").unwrap(), id);
    }

    #[test]
    fn test_concurrent_creates_keep_tree_consistent() {
        let shared = SharedRamFs::default();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let fs = shared.clone();
                thread::spawn(move || {
                    for i in 0..3 {
                        fs.with(|fs| fs.create_file(&format!("t{}-{}", t, i)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let fs = shared.lock();
        assert_eq!(fs.list_children(EntryId::ROOT, 16).unwrap().len(), 12);
        fs.verify_integrity().unwrap();
    }
}
