use extup_types::VersionOrdinal;
use serde::{Deserialize, Serialize};

/// Configuration migration events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MigrateEvent {
    /// A since-version migration callback is about to run
    ProcessStarted { since: VersionOrdinal },

    /// The migration callback finished
    ProcessCompleted { since: VersionOrdinal },
}
