//! In-memory recording host for tests

#![allow(clippy::missing_panics_doc)]

use crate::{DisableReason, PackageHost, RemovalOutcome};
use async_trait::async_trait;
use extup_errors::{Error, HostError};
use std::collections::BTreeSet;
use std::sync::Mutex;

/// One primitive invocation recorded by `MemoryHost`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Disable { package: String },
    Reenable { package: String },
    Install { package: String },
    Remove { package: String },
}

#[derive(Debug, Default)]
struct Inner {
    installed: BTreeSet<String>,
    disabled: BTreeSet<String>,
    calls: Vec<HostCall>,
    fail_install: Option<String>,
    defer_removals: bool,
}

/// Scriptable in-memory package host that records every primitive call
#[derive(Debug, Default)]
pub struct MemoryHost {
    inner: Mutex<Inner>,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the installed set
    #[must_use]
    pub fn with_installed<I, S>(self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.installed = packages.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Seed the disabled set
    #[must_use]
    pub fn with_disabled<I, S>(self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.disabled = packages.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Make every removal report `Deferred`
    #[must_use]
    pub fn with_deferred_removals(self, defer: bool) -> Self {
        self.inner.lock().unwrap().defer_removals = defer;
        self
    }

    /// Fail the next installs of the named package
    pub fn fail_install_of(&self, package: impl Into<String>) {
        self.inner.lock().unwrap().fail_install = Some(package.into());
    }

    /// Clear a scripted install failure
    pub fn clear_install_failure(&self) {
        self.inner.lock().unwrap().fail_install = None;
    }

    /// Every primitive call so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Current installed set
    #[must_use]
    pub fn installed_set(&self) -> BTreeSet<String> {
        self.inner.lock().unwrap().installed.clone()
    }

    /// Current disabled set
    #[must_use]
    pub fn disabled_set(&self) -> BTreeSet<String> {
        self.inner.lock().unwrap().disabled.clone()
    }
}

#[async_trait]
impl PackageHost for MemoryHost {
    async fn installed(&self) -> Result<BTreeSet<String>, Error> {
        Ok(self.inner.lock().unwrap().installed.clone())
    }

    async fn disable(
        &self,
        package: &str,
        _reason: DisableReason,
    ) -> Result<BTreeSet<String>, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::Disable {
            package: package.to_string(),
        });
        if inner.installed.contains(package) && !inner.disabled.contains(package) {
            inner.disabled.insert(package.to_string());
            Ok(BTreeSet::from([package.to_string()]))
        } else {
            Ok(BTreeSet::new())
        }
    }

    async fn reenable(&self, package: &str, _reason: DisableReason) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::Reenable {
            package: package.to_string(),
        });
        inner.disabled.remove(package);
        Ok(())
    }

    async fn install(&self, package: &str) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::Install {
            package: package.to_string(),
        });
        if inner.fail_install.as_deref() == Some(package) {
            return Err(HostError::InstallFailed {
                package: package.to_string(),
                message: "scripted failure".to_string(),
            }
            .into());
        }
        inner.installed.insert(package.to_string());
        Ok(())
    }

    async fn remove(&self, package: &str) -> Result<RemovalOutcome, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::Remove {
            package: package.to_string(),
        });
        if inner.defer_removals {
            return Ok(RemovalOutcome::Deferred);
        }
        inner.installed.remove(package);
        Ok(RemovalOutcome::Completed)
    }
}
