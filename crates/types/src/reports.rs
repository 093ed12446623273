//! Shared reporting types

use serde::{Deserialize, Serialize};
use std::fmt;

/// User-visible outcome of a bootstrap run
///
/// The three outcomes are deliberately distinct: an empty work queue is a
/// success, but is surfaced differently from a run that applied changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// First-ever run (no previously recorded version)
    Installed,
    /// Subsequent run that applied changes
    Updated,
    /// Queue was empty; nothing to update
    NothingToDo,
}

impl fmt::Display for BootstrapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed => write!(f, "installed"),
            Self::Updated => write!(f, "updated"),
            Self::NothingToDo => write!(f, "nothing to update"),
        }
    }
}
