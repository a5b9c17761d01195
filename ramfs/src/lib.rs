//! # RAMFS
//!
//! An in-memory hierarchical file store.
//!
//! ## Philosophy
//!
//! - **Ids, not pointers**: Entries live in a fixed table and refer to each
//!   other by [`EntryId`]
//! - **Explicit state**: The current-directory cursor belongs to the store
//!   value, not to the process
//! - **Content is borrowed from an allocator**: File bytes sit in buffers
//!   obtained from a [`hal::MemoryHal`] and go back to it on delete
//!
//! ## Example
//!
//! ```
//! use ramfs::RamFs;
//!
//! let mut fs = RamFs::new();
//! let docs = fs.create_directory("docs").unwrap();
//! fs.change_directory(docs).unwrap();
//! let file = fs.create_file("a.txt").unwrap();
//! fs.write(file, b"hello").unwrap();
//!
//! assert_eq!(fs.resolve("/docs/a.txt").unwrap(), file);
//! assert_eq!(fs.full_path(file).unwrap(), "/docs/a.txt");
//! assert_eq!(fs.read_to_vec(file).unwrap(), b"hello");
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod path;
pub mod shared;
pub mod store;
pub mod table;

pub use config::{
    ConfigError, RamFsConfig, WritePolicy, MAX_LOG_CAPACITY, MAX_TABLE_ENTRIES, MAX_WRITE_SLACK,
};
pub use core_types::EntryId;
pub use entry::{Entry, EntryKind};
pub use error::{FsError, FsResult};
pub use path::PathResolver;
pub use shared::SharedRamFs;
pub use store::RamFs;
pub use table::EntryTable;
