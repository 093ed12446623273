//! Single package install/remove operations

use extup_errors::Error;
use extup_events::{AppEvent, EventEmitter, EventSender, PackageEvent};
use extup_host::{DisableReason, PackageHost, RemovalOutcome};
use std::time::Duration;

/// One install or remove against the package host
///
/// Both operations first ask the host to disable the target package and
/// capture whether that actually affected it (the package might be
/// absent or already disabled). Only an affected package is re-enabled
/// afterwards. A settle delay is imposed after disabling and before
/// re-enabling so the host can release file handles and unregister the
/// package; it is a fixed pause, not a retry backoff.
pub struct PackageOperation<'a, H: PackageHost> {
    host: &'a H,
    settle: Duration,
    tx: Option<EventSender>,
}

impl<'a, H: PackageHost> PackageOperation<'a, H> {
    #[must_use]
    pub fn new(host: &'a H, settle: Duration) -> Self {
        Self {
            host,
            settle,
            tx: None,
        }
    }

    /// Attach an event sender for progress reporting
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Install a package
    ///
    /// # Errors
    ///
    /// Propagates host primitive failures unmodified; the caller has no
    /// recovery policy and aborts the run.
    pub async fn install(&self, package: &str) -> Result<(), Error> {
        self.emit(AppEvent::Package(PackageEvent::InstallStarted {
            package: package.to_string(),
        }));

        let affected = self.host.disable(package, DisableReason::Install).await?;
        let reenable = affected.contains(package);
        if reenable {
            self.emit(AppEvent::Package(PackageEvent::Disabled {
                package: package.to_string(),
            }));
        }
        self.settle().await;

        self.host.install(package).await?;

        if reenable {
            self.settle().await;
            self.host.reenable(package, DisableReason::Install).await?;
            self.emit(AppEvent::Package(PackageEvent::Reenabled {
                package: package.to_string(),
            }));
        }

        self.emit(AppEvent::Package(PackageEvent::Installed {
            package: package.to_string(),
        }));
        Ok(())
    }

    /// Remove a package
    ///
    /// A deferred outcome (host postpones deletion until restart) skips
    /// the re-enable step: the package stays marked for future removal.
    ///
    /// # Errors
    ///
    /// Propagates host primitive failures unmodified.
    pub async fn remove(&self, package: &str) -> Result<RemovalOutcome, Error> {
        self.emit(AppEvent::Package(PackageEvent::RemoveStarted {
            package: package.to_string(),
        }));

        let affected = self.host.disable(package, DisableReason::Remove).await?;
        let reenable = affected.contains(package);
        if reenable {
            self.emit(AppEvent::Package(PackageEvent::Disabled {
                package: package.to_string(),
            }));
        }
        self.settle().await;

        let outcome = self.host.remove(package).await?;

        if outcome == RemovalOutcome::Completed && reenable {
            self.settle().await;
            self.host.reenable(package, DisableReason::Remove).await?;
            self.emit(AppEvent::Package(PackageEvent::Reenabled {
                package: package.to_string(),
            }));
        }

        self.emit(AppEvent::Package(PackageEvent::Removed {
            package: package.to_string(),
            deferred: outcome.is_deferred(),
        }));
        Ok(outcome)
    }

    async fn settle(&self) {
        tokio::time::sleep(self.settle).await;
    }
}

impl<H: PackageHost> EventEmitter for PackageOperation<'_, H> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}
