use extup_types::{BootstrapOutcome, VersionOrdinal};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bootstrap domain events surfaced by ops/bootstrap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BootstrapEvent {
    /// Orchestration run started
    Started {
        previous: VersionOrdinal,
        current: VersionOrdinal,
    },

    /// Work queue resolved and filtered; sequencing is about to begin
    Planned {
        removals: Vec<String>,
        installs: Vec<String>,
        processes: usize,
    },

    /// Run completed and progress was committed
    Completed {
        outcome: BootstrapOutcome,
        removed: usize,
        installed: usize,
        processed: usize,
        duration: Duration,
    },

    /// Run aborted; no progress was committed
    Failed { message: String },
}
