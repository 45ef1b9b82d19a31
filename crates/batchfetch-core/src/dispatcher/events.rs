//! Observational events emitted by the dispatcher.

use crate::launcher::{ExitStatus, ProcessHandle};

use super::RunResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A fetcher was launched for item `seq` of `total` (1-based).
    Started {
        seq: usize,
        total: usize,
        handle: ProcessHandle,
        id: String,
    },
    /// The fetcher for item `seq` was observed to exit.
    Finished {
        seq: usize,
        total: usize,
        handle: ProcessHandle,
        id: String,
        status: ExitStatus,
    },
    /// Every item has finished. Sent exactly once, last.
    AllCompleted(RunResult),
}
