//! Filesystem-backed package host
//!
//! Installed packages are directories under the packages directory;
//! install copies the payload from a channel directory. The disable list
//! is the `ignored_packages` key of the preferences document, and
//! removals that cannot complete (directory busy) are deferred by
//! recording the name under `pending_removals` in the progress document
//! until the next host restart sweeps them.

use crate::{DisableReason, PackageHost, RemovalOutcome};
use async_trait::async_trait;
use extup_errors::{Error, HostError};
use extup_state::SettingsStore;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Document key for the disable list
pub const IGNORED_PACKAGES_KEY: &str = "ignored_packages";

/// Document key for removals deferred until the next restart
pub const PENDING_REMOVALS_KEY: &str = "pending_removals";

/// Package host over a packages directory and a channel directory
#[derive(Debug, Clone)]
pub struct DirectoryHost {
    packages_dir: PathBuf,
    channel_dir: PathBuf,
    settings: SettingsStore,
    preferences_document: String,
    progress_document: String,
}

impl DirectoryHost {
    #[must_use]
    pub fn new(
        packages_dir: impl Into<PathBuf>,
        channel_dir: impl Into<PathBuf>,
        settings: SettingsStore,
        preferences_document: impl Into<String>,
        progress_document: impl Into<String>,
    ) -> Self {
        Self {
            packages_dir: packages_dir.into(),
            channel_dir: channel_dir.into(),
            settings,
            preferences_document: preferences_document.into(),
            progress_document: progress_document.into(),
        }
    }

    fn package_path(&self, package: &str) -> PathBuf {
        self.packages_dir.join(package)
    }

    async fn is_installed(&self, package: &str) -> bool {
        tokio::fs::metadata(self.package_path(package))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn pending_removals(&self) -> Result<Vec<String>, Error> {
        let doc = self.settings.load(&self.progress_document).await?;
        Ok(doc.get_string_list(PENDING_REMOVALS_KEY))
    }

    async fn push_pending_removal(&self, package: &str) -> Result<(), Error> {
        let mut doc = self.settings.load(&self.progress_document).await?;
        let mut pending = doc.get_string_list(PENDING_REMOVALS_KEY);
        if !pending.iter().any(|p| p == package) {
            pending.push(package.to_string());
            doc.set_string_list(PENDING_REMOVALS_KEY, pending);
            self.settings.save(&doc).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PackageHost for DirectoryHost {
    async fn installed(&self) -> Result<BTreeSet<String>, Error> {
        let mut packages = BTreeSet::new();
        let mut entries = match tokio::fs::read_dir(&self.packages_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(packages),
            Err(e) => return Err(Error::io_with_path(&e, &self.packages_dir)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io_with_path(&e, &self.packages_dir))?
        {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                packages.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(packages)
    }

    async fn disable(
        &self,
        package: &str,
        _reason: DisableReason,
    ) -> Result<BTreeSet<String>, Error> {
        if !self.is_installed(package).await {
            return Ok(BTreeSet::new());
        }

        let mut doc = self.settings.load(&self.preferences_document).await?;
        let mut ignored = doc.get_string_list(IGNORED_PACKAGES_KEY);
        if ignored.iter().any(|p| p == package) {
            // Already disabled: nothing affected
            return Ok(BTreeSet::new());
        }

        ignored.push(package.to_string());
        doc.set_string_list(IGNORED_PACKAGES_KEY, ignored);
        self.settings
            .save(&doc)
            .await
            .map_err(|e| HostError::DisableFailed {
                package: package.to_string(),
                message: e.to_string(),
            })?;

        Ok(BTreeSet::from([package.to_string()]))
    }

    async fn reenable(&self, package: &str, _reason: DisableReason) -> Result<(), Error> {
        let mut doc = self.settings.load(&self.preferences_document).await?;
        let ignored = doc.get_string_list(IGNORED_PACKAGES_KEY);
        if !ignored.iter().any(|p| p == package) {
            return Ok(());
        }

        let remaining: Vec<String> = ignored.into_iter().filter(|p| p != package).collect();
        doc.set_string_list(IGNORED_PACKAGES_KEY, remaining);
        self.settings
            .save(&doc)
            .await
            .map_err(|e| HostError::ReenableFailed {
                package: package.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn install(&self, package: &str) -> Result<(), Error> {
        let dest = self.package_path(package);
        if self.is_installed(package).await {
            return Ok(());
        }

        let src = self.channel_dir.join(package);
        if !tokio::fs::metadata(&src)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(HostError::ChannelPackageMissing {
                package: package.to_string(),
                path: self.channel_dir.display().to_string(),
            }
            .into());
        }

        let package_name = package.to_string();
        tokio::task::spawn_blocking(move || copy_tree(&src, &dest))
            .await
            .map_err(|e| Error::internal(e.to_string()))?
            .map_err(|e| HostError::InstallFailed {
                package: package_name,
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn remove(&self, package: &str) -> Result<RemovalOutcome, Error> {
        if self.pending_removals().await?.iter().any(|p| p == package) {
            return Ok(RemovalOutcome::Deferred);
        }

        let path = self.package_path(package);
        let result = tokio::task::spawn_blocking(move || std::fs::remove_dir_all(path))
            .await
            .map_err(|e| Error::internal(e.to_string()))?;

        match result {
            Ok(()) => Ok(RemovalOutcome::Completed),
            // Already gone counts as done
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RemovalOutcome::Completed),
            // Busy directory: mark for removal on the next restart
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
                ) =>
            {
                self.push_pending_removal(package).await?;
                Ok(RemovalOutcome::Deferred)
            }
            Err(e) => Err(HostError::RemoveFailed {
                package: package.to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}

fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
