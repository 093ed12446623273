//! Report types for CLI output

use extup_types::{BootstrapOutcome, VersionOrdinal};
use serde::Serialize;

/// Report of a completed bootstrap run
#[derive(Clone, Debug, Serialize)]
pub struct BootstrapReport {
    pub outcome: BootstrapOutcome,
    pub previous: VersionOrdinal,
    pub current: VersionOrdinal,
    /// Packages removed this run (deferred ones included)
    pub removed: Vec<String>,
    /// Removals the host postponed until its next restart
    pub deferred: Vec<String>,
    /// Packages installed this run
    pub installed: Vec<String>,
    /// Migration processes that ran
    pub processes_run: usize,
    /// Installs dropped because the package was already present
    pub skipped_installs: Vec<String>,
    /// Removals dropped because the package was not installed
    pub skipped_removals: Vec<String>,
    pub duration_ms: u64,
}

/// Dry-run plan: what a bootstrap run would do right now
#[derive(Clone, Debug, Serialize)]
pub struct PlanReport {
    pub previous: VersionOrdinal,
    pub current: VersionOrdinal,
    pub removals: Vec<String>,
    pub installs: Vec<String>,
    /// Since-versions of the migration processes that would run
    pub processes: Vec<VersionOrdinal>,
    pub skipped_installs: Vec<String>,
    pub skipped_removals: Vec<String>,
}

impl PlanReport {
    /// Whether the plan contains any work
    #[must_use]
    pub fn has_work(&self) -> bool {
        !self.removals.is_empty() || !self.installs.is_empty() || !self.processes.is_empty()
    }
}

/// Recorded progress and pending-work status
#[derive(Clone, Debug, Serialize)]
pub struct StatusReport {
    pub previous: VersionOrdinal,
    pub current: VersionOrdinal,
    pub fresh_install: bool,
    pub pending: bool,
}
