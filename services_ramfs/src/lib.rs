//! # RAMFS Service
//!
//! This service provides path-based filesystem operations over a shared store.
//!
//! ## Philosophy
//!
//! - Callers speak in paths; the store speaks in entry ids
//! - Relative paths resolve against the store's cursor
//! - Every operation runs under one lock of the shared store
//!
//! ## Operations
//!
//! - `ls(path)`: List directory contents
//! - `stat(path)`: Get entry metadata
//! - `mkdir(path)` / `touch(path)`: Create entries in the current directory
//! - `cat(path)` / `write(path, bytes)`: Read and replace file content
//! - `rm(path)`: Delete an entry and its subtree
//! - `mv(path, name)`: Rename in place
//! - `cp(src, dst)`: Copy file content into a new entry
//! - `find(pattern)`: Search names across the whole tree
//! - `du(path)`: Sum sizes below an entry
//! - `cd(path)` / `pwd()`: Move and show the cursor

pub mod operations;
pub mod service;

pub use operations::{DiskUsage, FileSystemOperations, ListingEntry, OperationError, StatInfo};
pub use service::RamFsService;
