//! # Core Types
//!
//! This crate defines the identifier types shared by the RAMFS crates.
//!
//! ## Key Types
//!
//! - [`EntryId`]: Stable index of one slot in an entry table
//! - [`StoreId`]: Unique identifier for one independent store instance
//! - [`Fd`]: A file descriptor number handed out by the system-call layer

pub mod ids;

pub use ids::{EntryId, Fd, StoreId};
