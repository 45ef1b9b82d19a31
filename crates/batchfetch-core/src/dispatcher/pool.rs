//! Queue of items not yet launched and the set of running fetchers.

use std::collections::{HashMap, VecDeque};

use crate::item_list::WorkItem;
use crate::launcher::ProcessHandle;

/// Items not yet launched, in original list order. Only shrinks from the front.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: VecDeque<WorkItem>,
}

impl WorkQueue {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn pop_front(&mut self) -> Option<WorkItem> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Running fetchers keyed by process handle.
#[derive(Debug, Default)]
pub struct RunningSet {
    by_handle: HashMap<ProcessHandle, WorkItem>,
}

impl RunningSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_handle: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, handle: ProcessHandle, item: WorkItem) {
        let previous = self.by_handle.insert(handle, item);
        debug_assert!(previous.is_none(), "handle {} tracked twice", handle);
    }

    /// Remove and return the item for `handle`, if it is one of ours.
    pub fn remove(&mut self, handle: ProcessHandle) -> Option<WorkItem> {
        self.by_handle.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }
}
