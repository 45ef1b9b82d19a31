//! State of one dispatch run: fill phase, drain-and-refill phase, and the
//! launch step they share.

use std::path::Path;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::DispatchError;
use crate::item_list::WorkItem;
use crate::launcher::ProcessLauncher;

use super::events::DispatchEvent;
use super::pool::{RunningSet, WorkQueue};
use super::RunResult;

pub(super) struct RunState<'a, L: ProcessLauncher + ?Sized> {
    queue: WorkQueue,
    running: RunningSet,
    max_concurrent: usize,
    launcher: &'a mut L,
    fetcher: &'a Path,
    download_dir: &'a Path,
    events: Option<&'a UnboundedSender<DispatchEvent>>,
    total: usize,
    launched: usize,
    completed: usize,
}

impl<'a, L: ProcessLauncher + ?Sized> RunState<'a, L> {
    pub(super) fn new(
        items: Vec<WorkItem>,
        max_concurrent: usize,
        launcher: &'a mut L,
        fetcher: &'a Path,
        download_dir: &'a Path,
        events: Option<&'a UnboundedSender<DispatchEvent>>,
    ) -> Self {
        let total = items.len();
        Self {
            queue: WorkQueue::new(items),
            running: RunningSet::with_capacity(max_concurrent.min(total)),
            max_concurrent,
            launcher,
            fetcher,
            download_dir,
            events,
            total,
            launched: 0,
            completed: 0,
        }
    }

    /// Launch from the front of the queue until the pool is full or the queue is empty.
    pub(super) fn fill(&mut self) -> Result<(), DispatchError> {
        while self.running.len() < self.max_concurrent && !self.queue.is_empty() {
            self.launch_next()?;
        }
        Ok(())
    }

    /// Wait for exits until every item has finished, launching one
    /// replacement per tracked exit while the queue lasts.
    pub(super) fn drain(&mut self) -> Result<(), DispatchError> {
        while self.completed < self.total {
            let (handle, status) =
                self.launcher
                    .wait_any()
                    .map_err(|source| DispatchError::Wait {
                        launched: self.launched,
                        completed: self.completed,
                        source,
                    })?;

            let Some(item) = self.running.remove(handle) else {
                // Not one of ours (or no longer tracked): no count, no refill.
                tracing::debug!(pid = %handle, %status, "ignoring exit of untracked process");
                continue;
            };
            self.completed += 1;
            tracing::debug!(
                seq = item.seq(),
                pid = %handle,
                item = %item.id,
                %status,
                completed = self.completed,
                "fetcher exited"
            );
            self.emit(DispatchEvent::Finished {
                seq: item.seq(),
                total: self.total,
                handle,
                id: item.id,
                status,
            });

            if !self.queue.is_empty() {
                self.launch_next()?;
            }
        }
        Ok(())
    }

    /// Emit the final event and return the totals.
    pub(super) fn finish(self) -> RunResult {
        let result = RunResult {
            total: self.total,
            launched: self.launched,
            completed: self.completed,
        };
        self.emit(DispatchEvent::AllCompleted(result));
        result
    }

    fn launch_next(&mut self) -> Result<(), DispatchError> {
        let Some(item) = self.queue.pop_front() else {
            return Ok(());
        };

        let handle = match self.launcher.launch(self.fetcher, &item.id, self.download_dir) {
            Ok(handle) => handle,
            Err(source) => {
                tracing::error!(
                    seq = item.seq(),
                    item = %item.id,
                    error = %source,
                    running = self.running.len(),
                    "launch failed; aborting run and leaving running fetchers in place"
                );
                return Err(DispatchError::Launch {
                    index: item.index,
                    id: item.id,
                    launched: self.launched,
                    completed: self.completed,
                    source,
                });
            }
        };
        self.launched += 1;

        tracing::info!(
            seq = item.seq(),
            total = self.total,
            pid = %handle,
            item = %item.id,
            "started fetcher"
        );
        self.emit(DispatchEvent::Started {
            seq: item.seq(),
            total: self.total,
            handle,
            id: item.id.clone(),
        });
        self.running.insert(handle, item);
        debug_assert!(self.running.len() <= self.max_concurrent);
        Ok(())
    }

    fn emit(&self, event: DispatchEvent) {
        if let Some(tx) = self.events {
            // Receiver gone only means nobody is watching progress.
            let _ = tx.send(event);
        }
    }
}
