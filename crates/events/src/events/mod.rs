//! Domain-driven event definitions
//!
//! Events are grouped by functional domain and wrapped in the top-level
//! `AppEvent` enum that travels over the event channel.

mod bootstrap;
mod general;
mod migrate;
mod package;

pub use bootstrap::BootstrapEvent;
pub use general::GeneralEvent;
pub use migrate::MigrateEvent;
pub use package::PackageEvent;

use serde::{Deserialize, Serialize};

/// Top-level event type carried by the event channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Bootstrap orchestration lifecycle
    Bootstrap(BootstrapEvent),
    /// Individual package install/remove operations
    Package(PackageEvent),
    /// One-shot configuration migrations
    Migrate(MigrateEvent),
    /// Warnings, errors, and generic operation notices
    General(GeneralEvent),
}
