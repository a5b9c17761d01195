//! Raw memory allocator abstraction
//!
//! File content lives in buffers handed out by a [`MemoryHal`]. The store asks
//! for a buffer of an exact size and hands it back on release; the allocator
//! keeps the books so callers can observe leaks.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during memory operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemoryError {
    /// The allocator cannot satisfy the request
    #[error("Out of memory: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: usize, available: usize },

    /// The buffer was not handed out by this allocator, or was already released
    #[error("Unknown buffer handle: {0}")]
    UnknownBuffer(u64),
}

/// Opaque identity of one allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferHandle(u64);

impl BufferHandle {
    /// Returns the raw handle value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A raw byte buffer owned by exactly one holder
///
/// The buffer's capacity is its full length; how many of those bytes are
/// meaningful is tracked by the holder.
#[derive(Debug, PartialEq, Eq)]
pub struct Buffer {
    handle: BufferHandle,
    bytes: Vec<u8>,
}

impl Buffer {
    /// Returns the allocation handle
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// Returns the number of bytes allocated
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the whole buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the whole buffer, mutably
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// Allocation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Buffers handed out and not yet released
    pub live_buffers: usize,
    /// Bytes held by live buffers
    pub bytes_in_use: usize,
    /// Allocations served since creation
    pub total_allocations: u64,
    /// Releases accepted since creation
    pub total_releases: u64,
}

/// Raw allocator operations
///
/// This trait abstracts the kernel heap. Implementations must never hand out
/// the same handle twice.
pub trait MemoryHal {
    /// Allocates a zero-filled buffer of exactly `size` bytes
    fn allocate(&mut self, size: usize) -> Result<Buffer, MemoryError>;

    /// Returns a buffer to the allocator
    fn release(&mut self, buffer: Buffer) -> Result<(), MemoryError>;

    /// Returns the current allocation counters
    fn stats(&self) -> MemoryStats;
}

/// Heap-backed allocator with an optional byte limit
#[derive(Debug, Default)]
pub struct HeapAllocator {
    live: BTreeMap<BufferHandle, usize>,
    next_handle: u64,
    limit: Option<usize>,
    stats: MemoryStats,
}

impl HeapAllocator {
    /// Creates an unbounded allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator that refuses to hold more than `limit` bytes
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Returns the configured byte limit, if any
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

impl MemoryHal for HeapAllocator {
    fn allocate(&mut self, size: usize) -> Result<Buffer, MemoryError> {
        if let Some(limit) = self.limit {
            let available = limit.saturating_sub(self.stats.bytes_in_use);
            if size > available {
                return Err(MemoryError::OutOfMemory {
                    requested: size,
                    available,
                });
            }
        }

        let handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle, size);
        self.stats.live_buffers += 1;
        self.stats.bytes_in_use += size;
        self.stats.total_allocations += 1;

        Ok(Buffer {
            handle,
            bytes: vec![0; size],
        })
    }

    fn release(&mut self, buffer: Buffer) -> Result<(), MemoryError> {
        let size = self
            .live
            .remove(&buffer.handle)
            .ok_or(MemoryError::UnknownBuffer(buffer.handle.0))?;
        self.stats.live_buffers -= 1;
        self.stats.bytes_in_use -= size;
        self.stats.total_releases += 1;
        Ok(())
    }

    fn stats(&self) -> MemoryStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_release() {
        let mut heap = HeapAllocator::new();
        let buffer = heap.allocate(64).unwrap();
        assert_eq!(buffer.capacity(), 64);
        assert!(buffer.as_slice().iter().all(|b| *b == 0));
        assert_eq!(heap.stats().live_buffers, 1);
        assert_eq!(heap.stats().bytes_in_use, 64);

        heap.release(buffer).unwrap();
        assert_eq!(heap.stats().live_buffers, 0);
        assert_eq!(heap.stats().bytes_in_use, 0);
        assert_eq!(heap.stats().total_releases, 1);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut heap = HeapAllocator::new();
        let a = heap.allocate(1).unwrap();
        let b = heap.allocate(1).unwrap();
        assert_ne!(a.handle(), b.handle());
    }

    #[test]
    fn test_limit_enforced() {
        let mut heap = HeapAllocator::with_limit(100);
        let _held = heap.allocate(80).unwrap();
        let result = heap.allocate(30);
        assert_eq!(
            result,
            Err(MemoryError::OutOfMemory {
                requested: 30,
                available: 20
            })
        );
    }

    #[test]
    fn test_foreign_buffer_rejected() {
        let mut first = HeapAllocator::new();
        let mut second = HeapAllocator::new();
        let _ = second.allocate(4).unwrap();
        let _ = second.allocate(4).unwrap();
        let buffer = second.allocate(4).unwrap();

        let result = first.release(buffer);
        assert!(matches!(result, Err(MemoryError::UnknownBuffer(2))));
    }

    #[test]
    fn test_dropped_buffer_stays_accounted() {
        let mut heap = HeapAllocator::new();
        drop(heap.allocate(16).unwrap());
        assert_eq!(heap.stats().live_buffers, 1);
        assert_eq!(heap.stats().bytes_in_use, 16);
    }
}
