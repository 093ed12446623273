#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package host abstraction for extup
//!
//! The orchestrator consumes the host editor's package primitives through
//! the `PackageHost` trait: list installed packages, disable/re-enable a
//! package around an operation, install from the channel, and remove with
//! a possibly-deferred outcome. `DirectoryHost` is the filesystem-backed
//! implementation; `MemoryHost` is a recording double for tests.

mod directory;
mod memory;

pub use directory::{DirectoryHost, IGNORED_PACKAGES_KEY, PENDING_REMOVALS_KEY};
pub use memory::{HostCall, MemoryHost};

use async_trait::async_trait;
use extup_errors::Error;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Why a package is being disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableReason {
    Install,
    Remove,
}

impl fmt::Display for DisableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Result of a remove primitive
///
/// `Deferred` means the host postponed the actual deletion until its next
/// restart; the package stays on disk but is marked for future removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Completed,
    Deferred,
}

impl RemovalOutcome {
    #[must_use]
    pub fn is_deferred(self) -> bool {
        matches!(self, Self::Deferred)
    }
}

/// Host editor package primitives consumed by the orchestrator
///
/// The four collaborator roles (manager, disabler, installer, remover)
/// are one trait because they are always implemented by the same host
/// and the operation protocol needs them together.
#[async_trait]
pub trait PackageHost: Send + Sync {
    /// Names of currently-installed packages
    async fn installed(&self) -> Result<BTreeSet<String>, Error>;

    /// Disable a package ahead of an operation, returning the subset of
    /// packages actually affected (empty when the package is absent or
    /// already disabled)
    async fn disable(&self, package: &str, reason: DisableReason)
        -> Result<BTreeSet<String>, Error>;

    /// Re-enable a package after an operation
    async fn reenable(&self, package: &str, reason: DisableReason) -> Result<(), Error>;

    /// Install a package from the channel; installing an
    /// already-installed package is a no-op
    async fn install(&self, package: &str) -> Result<(), Error>;

    /// Remove a package, possibly deferring the deletion until the next
    /// host restart
    async fn remove(&self, package: &str) -> Result<RemovalOutcome, Error>;
}

#[async_trait]
impl<T: PackageHost + ?Sized> PackageHost for Arc<T> {
    async fn installed(&self) -> Result<BTreeSet<String>, Error> {
        (**self).installed().await
    }

    async fn disable(
        &self,
        package: &str,
        reason: DisableReason,
    ) -> Result<BTreeSet<String>, Error> {
        (**self).disable(package, reason).await
    }

    async fn reenable(&self, package: &str, reason: DisableReason) -> Result<(), Error> {
        (**self).reenable(package, reason).await
    }

    async fn install(&self, package: &str) -> Result<(), Error> {
        (**self).install(package).await
    }

    async fn remove(&self, package: &str) -> Result<RemovalOutcome, Error> {
        (**self).remove(package).await
    }
}
