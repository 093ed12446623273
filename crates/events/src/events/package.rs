use serde::{Deserialize, Serialize};

/// Package operation events surfaced by the sequencer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PackageEvent {
    /// Install operation started
    InstallStarted { package: String },

    /// Install operation completed
    Installed { package: String },

    /// Remove operation started
    RemoveStarted { package: String },

    /// Remove operation completed; `deferred` means the host postponed
    /// the actual deletion until its next restart
    Removed { package: String, deferred: bool },

    /// Package disabled for the duration of an operation
    Disabled { package: String },

    /// Package re-enabled after an operation
    Reenabled { package: String },

    /// Install dropped because the package is already installed
    SkippedAlreadyInstalled { package: String },

    /// Removal dropped because the package is not installed
    SkippedNotInstalled { package: String },
}
