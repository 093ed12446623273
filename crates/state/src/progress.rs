//! Progress record persistence

use crate::{SettingsDoc, SettingsStore};
use extup_errors::{ConfigError, Error};
use extup_types::{ProgressRecord, VersionOrdinal};

/// Document key for the last successfully-applied version
pub const PREVIOUS_VERSION_KEY: &str = "previous_version";

/// Document key for the externally-supplied tool version
pub const CURRENT_VERSION_KEY: &str = "current_version";

/// Persists the last successfully-applied version across tool runs
///
/// `current_version` is supplied externally and is never written here;
/// `previous_version` is written exactly once per run, only after the
/// full work queue has drained successfully or been determined empty.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    store: SettingsStore,
    document: String,
}

impl ProgressStore {
    #[must_use]
    pub fn new(store: SettingsStore, document: impl Into<String>) -> Self {
        Self {
            store,
            document: document.into(),
        }
    }

    /// Load the progress record
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if `current_version` is absent
    /// and `VersionError` if either version string is malformed. Both are
    /// fatal before any mutation.
    pub async fn load(&self) -> Result<ProgressRecord, Error> {
        let doc = self.store.load(&self.document).await?;

        let previous: VersionOrdinal = doc
            .get_str(PREVIOUS_VERSION_KEY)
            .unwrap_or("0.0.0")
            .parse()
            .map_err(Error::from)?;

        let current: VersionOrdinal = doc
            .get_str(CURRENT_VERSION_KEY)
            .ok_or_else(|| ConfigError::MissingField {
                field: "current_version".to_string(),
            })?
            .parse()
            .map_err(Error::from)?;

        Ok(ProgressRecord::new(previous, current))
    }

    /// Commit a new previous version, flushing before returning
    ///
    /// # Errors
    ///
    /// Returns `StateError::WriteFailed` if the document cannot be
    /// persisted.
    pub async fn save(&self, new_previous: &VersionOrdinal) -> Result<(), Error> {
        let mut doc = self.store.load(&self.document).await?;
        doc.set(PREVIOUS_VERSION_KEY, new_previous.to_string());
        self.store.save(&doc).await
    }

    /// Seed `current_version` (and a zero `previous_version` when absent)
    ///
    /// This is application-level glue for first-time setup; the
    /// orchestrator itself never writes `current_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or persisted.
    pub async fn seed_current(&self, current: &VersionOrdinal) -> Result<(), Error> {
        let mut doc = self.store.load(&self.document).await?;
        doc.set(CURRENT_VERSION_KEY, current.to_string());
        if doc.get_str(PREVIOUS_VERSION_KEY).is_none() {
            doc.set(PREVIOUS_VERSION_KEY, VersionOrdinal::zero().to_string());
        }
        self.store.save(&doc).await
    }

    /// Whether the progress document carries a `current_version`
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    pub async fn is_seeded(&self) -> Result<bool, Error> {
        let doc = self.store.load(&self.document).await?;
        Ok(doc.get_str(CURRENT_VERSION_KEY).is_some())
    }

    /// The raw document, for collaborators that share it
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    pub async fn document(&self) -> Result<SettingsDoc, Error> {
        self.store.load(&self.document).await
    }
}
