//! # Kernel API
//!
//! This crate defines the system-call interface between user-space code and
//! the kernel.
//!
//! ## Philosophy
//!
//! The kernel provides **mechanisms**, not policies:
//! - Console output and keyboard input on descriptors 1, 2 and 0
//! - Files on descriptors 3 and up, backed by the RAMFS store
//! - A per-process environment
//!
//! ## Design Goals
//!
//! 1. **Testability**: Devices are traits; the store is a shared handle
//! 2. **Explicitness**: Requests and responses are typed values
//! 3. **Compatibility**: Every outcome folds into the legacy return code
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A scheduler (one process, pid 1)
//! - A specific transport (requests are plain values)

pub mod error;
pub mod fd;
pub mod syscalls;

pub use error::{Errno, SyscallError};
pub use fd::{FdTable, OpenFile, MAX_FDS};
pub use syscalls::{
    SyscallLayer, SyscallNumber, SyscallRequest, SyscallResponse, SyscallResult, CURRENT_PID,
    ENV_NOT_SET,
};
