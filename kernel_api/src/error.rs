//! Syscall error types

use core_types::Fd;
use ramfs::FsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error numbers returned, negated, to callers of the raw interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum Errno {
    /// Operation not permitted
    Perm = 1,
    /// No such file or directory
    NoEnt = 2,
    /// Bad file descriptor
    BadF = 9,
    /// Out of memory
    NoMem = 12,
    /// File exists
    Exist = 17,
    /// Not a directory
    NotDir = 20,
    /// Is a directory
    IsDir = 21,
    /// Invalid argument
    Inval = 22,
    /// Too many open files
    MFile = 24,
    /// No space left
    NoSpc = 28,
}

impl Errno {
    /// Positive error number
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Errors that can occur while serving a syscall
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyscallError {
    /// The store refused the operation
    #[error(transparent)]
    Fs(#[from] FsError),

    /// Descriptor is not open, or not open for this direction
    #[error("Bad file descriptor: {0}")]
    BadDescriptor(Fd),

    /// Every descriptor number is taken
    #[error("Too many open files ({limit})")]
    TooManyOpenFiles { limit: usize },

    /// Malformed request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SyscallError {
    /// The error number reported for this error
    pub fn errno(&self) -> Errno {
        match self {
            SyscallError::Fs(fs) => match fs {
                FsError::NotFound(_) => Errno::NoEnt,
                FsError::NotADirectory(_) => Errno::NotDir,
                FsError::NotAFile(_) => Errno::IsDir,
                FsError::CannotDeleteRoot | FsError::CannotRenameRoot => Errno::Perm,
                FsError::TableFull { .. } | FsError::CapacityExceeded { .. } => Errno::NoSpc,
                FsError::AlreadyExists(_) => Errno::Exist,
                FsError::Allocation(_) => Errno::NoMem,
                FsError::InvalidId(_)
                | FsError::InvalidName(_)
                | FsError::Config(_)
                | FsError::Corrupted(_) => Errno::Inval,
            },
            SyscallError::BadDescriptor(_) => Errno::BadF,
            SyscallError::TooManyOpenFiles { .. } => Errno::MFile,
            SyscallError::InvalidArgument(_) => Errno::Inval,
        }
    }

    /// Negative return code for the raw interface
    pub fn return_code(&self) -> i64 {
        -i64::from(self.errno().code())
    }
}
