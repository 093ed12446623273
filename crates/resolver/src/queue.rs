//! Resolved work queue

use crate::ProcessEntry;

/// Net work derived from the registry for one orchestration run
///
/// `removals` and `installs` are order-preserving, duplicate-free lists;
/// `processes` is ascending by `since`. The queue is rebuilt fresh on
/// every run and discarded after completion.
#[derive(Debug, Default)]
pub struct WorkQueue {
    pub removals: Vec<String>,
    pub installs: Vec<String>,
    pub processes: Vec<ProcessEntry>,
}

impl WorkQueue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.installs.is_empty() && self.processes.is_empty()
    }

    /// Total number of queued steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.removals.len() + self.installs.len() + self.processes.len()
    }
}
