//! Error types: pre-run validation failures and fatal dispatch failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::launcher::LaunchError;

/// Validation failure before any fetcher process is launched.
///
/// All of these are recoverable by the caller: fix the input and run again.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid content type '{given}' (valid options: {valid})")]
    InvalidContentType { given: String, valid: String },

    #[error("fetcher not found: {}", .path.display())]
    FetcherNotFound { path: PathBuf },

    #[error("could not open item list '{}'", .path.display())]
    ItemListUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("item list '{}' is not valid UTF-8 (line {line})", .path.display())]
    ItemListNotUtf8 { path: PathBuf, line: usize },

    #[error("no item ids found in '{}'", .path.display())]
    ItemListEmpty { path: PathBuf },

    #[error("could not create download directory '{}'", .path.display())]
    DownloadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal failure in the middle of a run.
///
/// Children launched before the failure are left running; they are not
/// signalled and not waited for.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "failed to launch fetcher for item {} ({id}) after {launched} launch(es), {completed} completed",
        .index + 1
    )]
    Launch {
        index: usize,
        id: String,
        launched: usize,
        completed: usize,
        #[source]
        source: LaunchError,
    },

    #[error("waiting for fetcher processes failed ({launched} launched, {completed} completed)")]
    Wait {
        launched: usize,
        completed: usize,
        #[source]
        source: io::Error,
    },
}

impl DispatchError {
    /// Number of items whose process was observed to exit before the abort.
    pub fn completed(&self) -> usize {
        match self {
            DispatchError::Launch { completed, .. } | DispatchError::Wait { completed, .. } => {
                *completed
            }
        }
    }

    /// Number of processes successfully launched before the abort.
    pub fn launched(&self) -> usize {
        match self {
            DispatchError::Launch { launched, .. } | DispatchError::Wait { launched, .. } => {
                *launched
            }
        }
    }
}
