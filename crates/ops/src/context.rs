//! Operations context for dependency injection

use extup_config::Config;
use extup_errors::Error;
use extup_events::{EventEmitter, EventSender};
use extup_host::PackageHost;
use extup_resolver::MigrationRegistry;
use extup_state::{ProgressStore, SettingsStore};

/// Operations context providing access to all system components
///
/// The migration registry is injected here rather than living in a
/// process-wide table; a test constructs a fresh one per context.
pub struct OpsCtx<H: PackageHost> {
    /// Package host primitives
    pub host: H,
    /// Settings document store
    pub settings: SettingsStore,
    /// Progress record persistence
    pub progress: ProgressStore,
    /// Delta and process tables
    pub registry: MigrationRegistry,
    /// System configuration
    pub config: Config,
    /// Event sender for progress reporting
    pub tx: EventSender,
}

impl<H: PackageHost> EventEmitter for OpsCtx<H> {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for `OpsCtx`
pub struct OpsCtxBuilder<H: PackageHost> {
    host: Option<H>,
    settings: Option<SettingsStore>,
    progress: Option<ProgressStore>,
    registry: Option<MigrationRegistry>,
    config: Option<Config>,
    tx: Option<EventSender>,
}

impl<H: PackageHost> Default for OpsCtxBuilder<H> {
    fn default() -> Self {
        Self {
            host: None,
            settings: None,
            progress: None,
            registry: None,
            config: None,
            tx: None,
        }
    }
}

impl<H: PackageHost> OpsCtxBuilder<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressStore) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: MigrationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an internal error naming the first missing component.
    pub fn build(self) -> Result<OpsCtx<H>, Error> {
        let missing = |field: &str| Error::internal(format!("OpsCtx is missing {field}"));
        Ok(OpsCtx {
            host: self.host.ok_or_else(|| missing("host"))?,
            settings: self.settings.ok_or_else(|| missing("settings"))?,
            progress: self.progress.ok_or_else(|| missing("progress"))?,
            registry: self.registry.ok_or_else(|| missing("registry"))?,
            config: self.config.unwrap_or_default(),
            tx: self.tx.ok_or_else(|| missing("event sender"))?,
        })
    }
}
