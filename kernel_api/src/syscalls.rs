//! Syscall boundary implemented as typed requests.
//!
//! Requests and responses are plain serializable enums. [`SyscallLayer`]
//! executes them against the keyboard, the console, a descriptor table and
//! a shared store.

use crate::error::SyscallError;
use crate::fd::{FdTable, OpenFile};
use core_types::{EntryId, Fd};
use hal::{ConsoleDevice, HeapAllocator, KeyboardDevice, MemoryHal};
use ramfs::{FsError, SharedRamFs};
use serde::{Deserialize, Serialize};
use services_logger::{LogEntry, LogLevel};
use std::collections::BTreeMap;

const COMPONENT: &str = "syscall";

/// Pid reported by [`SyscallRequest::GetPid`]; there is one process
pub const CURRENT_PID: u32 = 1;

/// Return code of a `GetEnv` for a variable that is not set
pub const ENV_NOT_SET: i64 = -1;

/// Raw syscall numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum SyscallNumber {
    Exit = 1,
    Write = 2,
    Read = 3,
    Open = 4,
    Close = 5,
    GetPid = 9,
    GetEnv = 15,
    SetEnv = 16,
}

impl SyscallNumber {
    /// Maps a raw number to a known syscall
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(SyscallNumber::Exit),
            2 => Some(SyscallNumber::Write),
            3 => Some(SyscallNumber::Read),
            4 => Some(SyscallNumber::Open),
            5 => Some(SyscallNumber::Close),
            9 => Some(SyscallNumber::GetPid),
            15 => Some(SyscallNumber::GetEnv),
            16 => Some(SyscallNumber::SetEnv),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Typed syscall requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyscallRequest {
    Exit { status: i32 },
    Write { fd: Fd, data: Vec<u8> },
    Read { fd: Fd, max_len: usize },
    Open { path: String, create: bool },
    Close { fd: Fd },
    GetPid,
    GetEnv { key: String },
    SetEnv { key: String, value: String },
}

impl SyscallRequest {
    /// The raw number this request travels under
    pub fn number(&self) -> SyscallNumber {
        match self {
            SyscallRequest::Exit { .. } => SyscallNumber::Exit,
            SyscallRequest::Write { .. } => SyscallNumber::Write,
            SyscallRequest::Read { .. } => SyscallNumber::Read,
            SyscallRequest::Open { .. } => SyscallNumber::Open,
            SyscallRequest::Close { .. } => SyscallNumber::Close,
            SyscallRequest::GetPid => SyscallNumber::GetPid,
            SyscallRequest::GetEnv { .. } => SyscallNumber::GetEnv,
            SyscallRequest::SetEnv { .. } => SyscallNumber::SetEnv,
        }
    }
}

/// Typed syscall responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyscallResponse {
    Exited(i32),
    Count(usize),
    Data(Vec<u8>),
    Opened(Fd),
    Closed,
    Pid(u32),
    Env(Option<String>),
    EnvSet,
}

impl SyscallResponse {
    /// Non-negative return code for the raw interface
    pub fn return_code(&self) -> i64 {
        match self {
            SyscallResponse::Exited(status) => i64::from(*status),
            SyscallResponse::Count(count) => *count as i64,
            SyscallResponse::Data(data) => data.len() as i64,
            SyscallResponse::Opened(fd) => i64::from(fd.0),
            SyscallResponse::Pid(pid) => i64::from(*pid),
            SyscallResponse::Env(None) => ENV_NOT_SET,
            SyscallResponse::Closed | SyscallResponse::Env(Some(_)) | SyscallResponse::EnvSet => 0,
        }
    }
}

/// Result type used in syscall responses.
pub type SyscallResult<T> = Result<T, SyscallError>;

/// Executes syscalls for one process
pub struct SyscallLayer<K, C, A: MemoryHal = HeapAllocator> {
    fs: SharedRamFs<A>,
    keyboard: K,
    console: C,
    fds: FdTable,
    env: BTreeMap<String, String>,
    exit_status: Option<i32>,
}

impl<K: KeyboardDevice, C: ConsoleDevice, A: MemoryHal> SyscallLayer<K, C, A> {
    pub fn new(fs: SharedRamFs<A>, keyboard: K, console: C) -> Self {
        Self {
            fs,
            keyboard,
            console,
            fds: FdTable::new(),
            env: BTreeMap::new(),
            exit_status: None,
        }
    }

    /// Executes one request
    pub fn handle(&mut self, request: SyscallRequest) -> SyscallResult<SyscallResponse> {
        match request {
            SyscallRequest::Exit { status } => {
                self.exit_status = Some(status);
                self.trace(LogLevel::Info, "exit", None);
                Ok(SyscallResponse::Exited(status))
            }
            SyscallRequest::Write { fd, data } => self.sys_write(fd, &data),
            SyscallRequest::Read { fd, max_len } => self.sys_read(fd, max_len),
            SyscallRequest::Open { path, create } => self.sys_open(&path, create),
            SyscallRequest::Close { fd } => self.sys_close(fd),
            SyscallRequest::GetPid => Ok(SyscallResponse::Pid(CURRENT_PID)),
            SyscallRequest::GetEnv { key } => Ok(SyscallResponse::Env(self.env.get(&key).cloned())),
            SyscallRequest::SetEnv { key, value } => {
                if key.is_empty() {
                    return Err(SyscallError::InvalidArgument("empty variable name".to_string()));
                }
                self.env.insert(key, value);
                Ok(SyscallResponse::EnvSet)
            }
        }
    }

    /// Executes one request and folds the outcome into a raw return code
    pub fn dispatch(&mut self, request: SyscallRequest) -> i64 {
        match self.handle(request) {
            Ok(response) => response.return_code(),
            Err(e) => e.return_code(),
        }
    }

    fn sys_write(&mut self, fd: Fd, data: &[u8]) -> SyscallResult<SyscallResponse> {
        if data.is_empty() {
            return Err(SyscallError::InvalidArgument("empty write".to_string()));
        }

        match fd {
            Fd::STDOUT | Fd::STDERR => {
                let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
                self.console.write_bytes(&data[..end]);
                Ok(SyscallResponse::Count(data.len()))
            }
            Fd::STDIN => Err(self.bad_descriptor(fd)),
            _ => {
                let open = self.open_file(fd)?;
                let mut fs = self.fs.lock();
                // A deleted entry's slot may already hold a different entry.
                if fs.generation(open.entry) != Ok(open.generation) {
                    drop(fs);
                    return Err(self.stale_descriptor(fd, open));
                }
                let mut content = fs.read_to_vec(open.entry)?;
                let offset = open.offset.min(content.len());
                content.truncate(offset);
                content.extend_from_slice(data);
                fs.write(open.entry, &content)?;
                drop(fs);

                self.fds.get_mut(fd)?.offset = offset + data.len();
                Ok(SyscallResponse::Count(data.len()))
            }
        }
    }

    fn sys_read(&mut self, fd: Fd, max_len: usize) -> SyscallResult<SyscallResponse> {
        match fd {
            Fd::STDIN => {
                if max_len == 0 {
                    return Ok(SyscallResponse::Data(Vec::new()));
                }
                let data = self.keyboard.poll_byte().map(|b| vec![b]).unwrap_or_default();
                Ok(SyscallResponse::Data(data))
            }
            Fd::STDOUT | Fd::STDERR => Err(self.bad_descriptor(fd)),
            _ => {
                let open = self.open_file(fd)?;
                let content = {
                    let fs = self.fs.lock();
                    if fs.generation(open.entry) == Ok(open.generation) {
                        Some(fs.read_to_vec(open.entry)?)
                    } else {
                        None
                    }
                };
                let content = match content {
                    Some(content) => content,
                    None => return Err(self.stale_descriptor(fd, open)),
                };
                let start = open.offset.min(content.len());
                let end = start.saturating_add(max_len).min(content.len());

                self.fds.get_mut(fd)?.offset = end;
                Ok(SyscallResponse::Data(content[start..end].to_vec()))
            }
        }
    }

    fn sys_open(&mut self, path: &str, create: bool) -> SyscallResult<SyscallResponse> {
        let (entry, generation) = {
            let mut fs = self.fs.lock();
            let id = match fs.resolve(path) {
                Ok(id) => id,
                Err(FsError::NotFound(_)) if create => fs.create_file(path)?,
                Err(e) => return Err(e.into()),
            };
            if fs.entry(id)?.is_directory() {
                return Err(FsError::NotAFile(id).into());
            }
            (id, fs.generation(id)?)
        };

        let fd = self.fds.open(entry, generation)?;
        self.trace(LogLevel::Debug, "open", Some((fd, entry)));
        Ok(SyscallResponse::Opened(fd))
    }

    fn sys_close(&mut self, fd: Fd) -> SyscallResult<SyscallResponse> {
        if fd.is_standard() {
            return Err(self.bad_descriptor(fd));
        }
        let closed = match self.fds.close(fd) {
            Ok(closed) => closed,
            Err(e) => {
                self.trace(LogLevel::Warn, "close of unknown descriptor", None);
                return Err(e);
            }
        };
        self.trace(LogLevel::Debug, "close", Some((fd, closed.entry)));
        Ok(SyscallResponse::Closed)
    }

    fn open_file(&mut self, fd: Fd) -> SyscallResult<OpenFile> {
        let found = self.fds.get(fd).map(|open| *open);
        match found {
            Ok(open) => Ok(open),
            Err(_) => Err(self.bad_descriptor(fd)),
        }
    }

    fn stale_descriptor(&mut self, fd: Fd, open: OpenFile) -> SyscallError {
        self.trace(LogLevel::Warn, "descriptor outlived its entry", Some((fd, open.entry)));
        SyscallError::BadDescriptor(fd)
    }

    fn bad_descriptor(&mut self, fd: Fd) -> SyscallError {
        self.trace(LogLevel::Warn, format!("bad descriptor {}", fd), None);
        SyscallError::BadDescriptor(fd)
    }

    fn trace(&mut self, level: LogLevel, message: impl Into<String>, target: Option<(Fd, EntryId)>) {
        let mut entry = LogEntry::new(level, COMPONENT, message);
        if let Some((fd, id)) = target {
            entry = entry.with_field("fd", fd.0).with_field("id", id.as_u32());
        }
        self.fs.with(|fs| fs.log_mut().record(entry));
    }

    /// Looks up an environment variable
    pub fn getenv(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Environment variables in key order
    pub fn env_vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Status passed to the last `Exit`, if any
    pub fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }

    /// The open descriptor table
    pub fn fds(&self) -> &FdTable {
        &self.fds
    }

    /// The store this layer serves
    pub fn store(&self) -> &SharedRamFs<A> {
        &self.fs
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut K {
        &mut self.keyboard
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }
}
