//! Bounded-concurrency dispatch of fetcher processes.
//!
//! Keeps up to `max_concurrent` fetchers running at once: fills the pool from
//! the front of the item list, then waits for any child to exit and starts
//! exactly one replacement per observed exit until the list is drained and
//! every launched child has been seen to finish.
//!
//! All state (queue, running set, counters) is owned by one `run` call on one
//! thread. Progress leaves through an optional unbounded channel so the loop
//! never blocks on a slow consumer.

mod events;
mod pool;
mod run;


use std::path::Path;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::DispatchError;
use crate::item_list::WorkItem;
use crate::launcher::ProcessLauncher;

pub use events::DispatchEvent;

/// Totals at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunResult {
    pub total: usize,
    pub launched: usize,
    pub completed: usize,
}

/// Pool controller with a fixed concurrency ceiling.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    max_concurrent: usize,
}

impl Dispatcher {
    /// A ceiling of 0 is treated as 1.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run every item through `fetcher` with `download_dir` as the child's
    /// working directory. Blocks until all launched children have exited.
    ///
    /// Exit statuses never affect control flow: a failing fetch counts as
    /// completed. If a launch fails the run stops at once with
    /// [`DispatchError::Launch`]; children already running are left alone
    /// (not killed, not waited for).
    pub fn run<L: ProcessLauncher + ?Sized>(
        &self,
        items: Vec<WorkItem>,
        launcher: &mut L,
        fetcher: &Path,
        download_dir: &Path,
        events: Option<&UnboundedSender<DispatchEvent>>,
    ) -> Result<RunResult, DispatchError> {
        let total = items.len();
        tracing::info!(
            total,
            max_concurrent = self.max_concurrent,
            fetcher = %fetcher.display(),
            dir = %download_dir.display(),
            "dispatch starting"
        );

        let mut state = run::RunState::new(
            items,
            self.max_concurrent,
            launcher,
            fetcher,
            download_dir,
            events,
        );
        state.fill()?;
        state.drain()?;
        let result = state.finish();

        tracing::info!(
            launched = result.launched,
            completed = result.completed,
            "dispatch finished"
        );
        Ok(result)
    }
}
