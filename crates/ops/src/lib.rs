#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for extup
//!
//! This crate is the boundary between the CLI and the specialized
//! crates: it loads recorded progress, resolves the work queue, applies
//! the override list, filters against the host's installed set, drains
//! the queue through the sequencer, and commits the new version exactly
//! once per successful run.

mod bootstrap;
mod context;
mod plan;
mod types;
mod work;

pub use bootstrap::bootstrap;
pub use context::{OpsCtx, OpsCtxBuilder};
pub use plan::{plan, status};
pub use types::{BootstrapReport, PlanReport, StatusReport};

use extup_errors::Error;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OperationResult {
    /// Bootstrap run report
    Bootstrap(BootstrapReport),
    /// Dry-run plan
    Plan(PlanReport),
    /// Progress status
    Status(StatusReport),
    /// Generic success message
    Success(String),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns `OpsError::SerializationError` if encoding fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            extup_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }
}
