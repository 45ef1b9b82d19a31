//! The only seam between the dispatcher and the operating system's process API.
//!
//! The dispatcher needs two primitives: start one fetcher process for one
//! item, and block until *any* started process exits. `ProcessLauncher`
//! captures exactly those; `OsLauncher` implements them with
//! `std::process::Command` and `waitpid(-1)`. Tests substitute a scripted
//! launcher.

#[cfg(unix)]
mod os;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[cfg(unix)]
pub use os::OsLauncher;

/// OS-assigned identifier of a live child process (the pid on unix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessHandle(u32);

impl ProcessHandle {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw wait status of an exited child, as reported by `waitpid`.
///
/// The dispatcher never branches on it; it is carried through so callers can
/// log it or build their own success tracking on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Status of a child that called `exit(code)`.
    pub fn from_code(code: u8) -> Self {
        Self(i32::from(code) << 8)
    }

    /// Exit code if the process exited normally.
    pub fn code(&self) -> Option<i32> {
        if self.0 & 0x7f == 0 {
            Some((self.0 >> 8) & 0xff)
        } else {
            None
        }
    }

    /// Terminating signal if the process was killed by one.
    pub fn signal(&self) -> Option<i32> {
        let sig = self.0 & 0x7f;
        if sig != 0 && sig != 0x7f {
            Some(sig)
        } else {
            None
        }
    }

    pub fn success(&self) -> bool {
        self.code() == Some(0)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code(), self.signal()) {
            (Some(code), _) => write!(f, "exit code {}", code),
            (None, Some(sig)) => write!(f, "signal {}", sig),
            (None, None) => write!(f, "wait status {:#x}", self.0),
        }
    }
}

/// The operating system refused to create a fetcher process.
#[derive(Debug, Error)]
#[error("could not start {}", .program.display())]
pub struct LaunchError {
    pub program: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Starts fetcher processes and reports their exits.
pub trait ProcessLauncher {
    /// Start `program arg` with `cwd` as its working directory.
    fn launch(&mut self, program: &Path, arg: &str, cwd: &Path)
        -> Result<ProcessHandle, LaunchError>;

    /// Block until any child exits and return its handle and status.
    ///
    /// No ordering among siblings is implied, and the handle may belong to a
    /// process this launcher did not start.
    fn wait_any(&mut self) -> io::Result<(ProcessHandle, ExitStatus)>;
}
