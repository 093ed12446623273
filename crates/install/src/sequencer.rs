//! Strictly sequential step sequencer

use crate::PackageOperation;
use extup_errors::Error;
use extup_events::{AppEvent, EventEmitter, EventSender, MigrateEvent};
use extup_host::PackageHost;
use extup_resolver::{ProcessEntry, WorkQueue};
use std::collections::VecDeque;
use std::time::Duration;

/// Sequencer configuration
#[derive(Clone, Debug)]
pub struct SequencerConfig {
    /// Settle delay imposed around disable/install/remove
    pub settle_delay: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1000),
        }
    }
}

impl SequencerConfig {
    /// Set the settle delay
    #[must_use]
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

/// What a drained queue applied
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SequenceSummary {
    pub removed: Vec<String>,
    pub deferred: Vec<String>,
    pub installed: Vec<String>,
    pub processed: usize,
}

impl SequenceSummary {
    /// Total number of applied steps
    #[must_use]
    pub fn total(&self) -> usize {
        self.removed.len() + self.installed.len() + self.processed
    }
}

/// Current phase of the drain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Removing,
    Installing,
    Processing,
    Done,
}

/// Drives a work queue through strictly sequential asynchronous steps
///
/// Removals run first, then installs, then migration processes,
/// regardless of registration order. The sequencer pops one item,
/// awaits its completion, and only then pops the next: exactly one
/// operation is in flight at any time, structurally. An empty sub-queue
/// falls through to the next phase immediately; a fully empty queue
/// returns at once with an empty summary, which callers surface as
/// "nothing to do" rather than "N operations applied".
pub struct StepSequencer<'a, H: PackageHost> {
    operation: PackageOperation<'a, H>,
    removals: VecDeque<String>,
    installs: VecDeque<String>,
    processes: VecDeque<ProcessEntry>,
    phase: Phase,
    tx: Option<EventSender>,
}

impl<'a, H: PackageHost> StepSequencer<'a, H> {
    #[must_use]
    pub fn new(host: &'a H, queue: WorkQueue, config: &SequencerConfig) -> Self {
        Self {
            operation: PackageOperation::new(host, config.settle_delay),
            removals: queue.removals.into(),
            installs: queue.installs.into(),
            processes: queue.processes.into(),
            phase: Phase::Removing,
            tx: None,
        }
    }

    /// Attach an event sender for progress reporting
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.operation = self.operation.with_event_sender(tx.clone());
        self.tx = Some(tx);
        self
    }

    /// Whether there is nothing to drain
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.installs.is_empty() && self.processes.is_empty()
    }

    /// Drain the queue to completion
    ///
    /// # Errors
    ///
    /// The first failing step aborts the drain and propagates; there is
    /// no recovery policy and nothing is committed by this layer.
    pub async fn run(mut self) -> Result<SequenceSummary, Error> {
        let mut summary = SequenceSummary::default();
        if self.is_empty() {
            return Ok(summary);
        }

        loop {
            match self.phase {
                Phase::Removing => {
                    if let Some(package) = self.removals.pop_front() {
                        let outcome = self.operation.remove(&package).await?;
                        if outcome.is_deferred() {
                            summary.deferred.push(package.clone());
                        }
                        summary.removed.push(package);
                    } else {
                        self.phase = Phase::Installing;
                    }
                }
                Phase::Installing => {
                    if let Some(package) = self.installs.pop_front() {
                        self.operation.install(&package).await?;
                        summary.installed.push(package);
                    } else {
                        self.phase = Phase::Processing;
                    }
                }
                Phase::Processing => {
                    if let Some(entry) = self.processes.pop_front() {
                        self.emit(AppEvent::Migrate(MigrateEvent::ProcessStarted {
                            since: entry.since.clone(),
                        }));
                        (entry.action)().await?;
                        self.emit(AppEvent::Migrate(MigrateEvent::ProcessCompleted {
                            since: entry.since,
                        }));
                        summary.processed += 1;
                    } else {
                        self.phase = Phase::Done;
                    }
                }
                Phase::Done => return Ok(summary),
            }
        }
    }
}

impl<H: PackageHost> EventEmitter for StepSequencer<'_, H> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}
