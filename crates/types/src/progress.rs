//! Durable bootstrap progress record

use crate::VersionOrdinal;
use serde::{Deserialize, Serialize};

/// The only durable entity of the orchestrator
///
/// `previous` is the last version whose work queue fully drained;
/// `current` is supplied externally (the embedded tool version) and is
/// only ever read by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub previous: VersionOrdinal,
    pub current: VersionOrdinal,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(previous: VersionOrdinal, current: VersionOrdinal) -> Self {
        Self { previous, current }
    }

    /// Whether this record has never committed a bootstrap run
    #[must_use]
    pub fn is_fresh_install(&self) -> bool {
        self.previous.is_zero()
    }

    /// Whether the recorded version lags the current one
    #[must_use]
    pub fn is_behind(&self) -> bool {
        self.previous < self.current
    }
}
