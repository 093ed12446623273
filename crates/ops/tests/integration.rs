//! End-to-end orchestration tests over an in-memory host

use extup_config::Config;
use extup_events::{AppEvent, BootstrapEvent, EventReceiver, PackageEvent};
use extup_host::{HostCall, MemoryHost};
use extup_ops::{bootstrap, plan, status, OpsCtx, OpsCtxBuilder};
use extup_resolver::MigrationRegistry;
use extup_state::{ProgressStore, SettingsStore, CURRENT_VERSION_KEY, PREVIOUS_VERSION_KEY};
use extup_types::{BootstrapOutcome, VersionOrdinal};
use std::sync::Arc;

fn v(s: &str) -> VersionOrdinal {
    s.parse().unwrap()
}

/// Registry used by most tests: base set at 1.0.0, revision at 1.4.0
fn catalog() -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();
    registry.register_delta(v("1.0.0"), Vec::<String>::new(), ["A", "B"]);
    registry.register_delta(v("1.4.0"), ["A"], ["C"]);
    registry
}

struct Fixture {
    dir: tempfile::TempDir,
    settings: SettingsStore,
    rx: EventReceiver,
}

impl Fixture {
    async fn new(previous: Option<&str>, current: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::new(dir.path().join("state"));

        let mut doc = settings.load("extup").await.unwrap();
        doc.set(CURRENT_VERSION_KEY, current);
        if let Some(previous) = previous {
            doc.set(PREVIOUS_VERSION_KEY, previous);
        }
        settings.save(&doc).await.unwrap();

        let (_, rx) = extup_events::channel();
        Self { dir, settings, rx }
    }

    fn ctx<H: extup_host::PackageHost>(&mut self, host: H, registry: MigrationRegistry) -> OpsCtx<H> {
        let mut config = Config::default();
        config.bootstrap.override_file = Some(self.dir.path().join("extra-packages.txt"));
        config.bootstrap.settle_delay_ms = 10;

        let (tx, rx) = extup_events::channel();
        self.rx = rx;

        OpsCtxBuilder::new()
            .with_host(host)
            .with_settings(self.settings.clone())
            .with_progress(ProgressStore::new(self.settings.clone(), "extup"))
            .with_registry(registry)
            .with_config(config)
            .with_event_sender(tx)
            .build()
            .unwrap()
    }

    fn drain_events(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn recorded_previous(&self) -> Option<String> {
        let doc = self.settings.load("extup").await.unwrap();
        doc.get_str(PREVIOUS_VERSION_KEY).map(ToString::to_string)
    }
}

#[tokio::test(start_paused = true)]
async fn test_fresh_install_applies_net_queue_and_commits() {
    let mut fx = Fixture::new(None, "1.4.0").await;
    let ctx = fx.ctx(MemoryHost::new(), catalog());

    let report = bootstrap(&ctx).await.unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::Installed);
    // A was added at 1.0.0 and removed at 1.4.0: cancelled out
    assert_eq!(report.installed, vec!["B".to_string(), "C".to_string()]);
    assert!(report.removed.is_empty());
    assert_eq!(fx.recorded_previous().await.as_deref(), Some("1.4.0"));

    let events = fx.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Bootstrap(BootstrapEvent::Completed {
            outcome: BootstrapOutcome::Installed,
            ..
        })
    )));
}

#[tokio::test(start_paused = true)]
async fn test_incremental_update_removes_then_installs() {
    let mut fx = Fixture::new(Some("1.0.0"), "1.4.0").await;
    let host = MemoryHost::new().with_installed(["A", "B"]);
    let ctx = fx.ctx(host, catalog());

    let report = bootstrap(&ctx).await.unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::Updated);
    assert_eq!(report.removed, vec!["A".to_string()]);
    assert_eq!(report.installed, vec!["C".to_string()]);

    let calls = ctx.host.calls();
    let remove_pos = calls
        .iter()
        .position(|c| matches!(c, HostCall::Remove { .. }))
        .unwrap();
    let install_pos = calls
        .iter()
        .position(|c| matches!(c, HostCall::Install { .. }))
        .unwrap();
    assert!(remove_pos < install_pos);
}

#[tokio::test(start_paused = true)]
async fn test_version_bump_with_no_work_still_advances_progress() {
    let mut fx = Fixture::new(Some("1.4.0"), "1.5.0").await;
    let ctx = fx.ctx(MemoryHost::new().with_installed(["B", "C"]), catalog());

    let report = bootstrap(&ctx).await.unwrap();

    assert_eq!(report.outcome, BootstrapOutcome::NothingToDo);
    assert!(ctx.host.calls().is_empty());
    assert_eq!(fx.recorded_previous().await.as_deref(), Some("1.5.0"));
}

#[tokio::test(start_paused = true)]
async fn test_already_installed_package_never_reaches_installer() {
    let mut fx = Fixture::new(None, "1.0.0").await;
    let host = MemoryHost::new().with_installed(["A", "B"]);
    let ctx = fx.ctx(host, catalog());

    let report = bootstrap(&ctx).await.unwrap();

    assert!(!ctx
        .host
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::Install { .. })));
    assert_eq!(
        report.skipped_installs,
        vec!["A".to_string(), "B".to_string()]
    );
    assert_eq!(report.outcome, BootstrapOutcome::NothingToDo);

    let events = fx.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Package(PackageEvent::SkippedAlreadyInstalled { .. })
    )));
}

#[tokio::test(start_paused = true)]
async fn test_removal_of_absent_package_is_skipped() {
    let mut fx = Fixture::new(Some("1.0.0"), "1.4.0").await;
    // A is not installed, so its removal is dropped silently
    let ctx = fx.ctx(MemoryHost::new(), catalog());

    let report = bootstrap(&ctx).await.unwrap();

    assert_eq!(report.skipped_removals, vec!["A".to_string()]);
    assert!(!ctx
        .host
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::Remove { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_failure_aborts_without_commit() {
    let mut fx = Fixture::new(None, "1.4.0").await;
    let host = MemoryHost::new();
    host.fail_install_of("C");
    let ctx = fx.ctx(host, catalog());

    assert!(bootstrap(&ctx).await.is_err());

    // No commit: previous_version was never written
    assert_eq!(fx.recorded_previous().await, None);
    let events = fx.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, AppEvent::Bootstrap(BootstrapEvent::Failed { .. }))));
}

#[tokio::test(start_paused = true)]
async fn test_rerun_after_partial_failure_completes_remaining_work() {
    let mut fx = Fixture::new(None, "1.4.0").await;
    let host = Arc::new(MemoryHost::new());
    host.fail_install_of("C");

    let ctx = fx.ctx(Arc::clone(&host), catalog());
    assert!(bootstrap(&ctx).await.is_err());
    // B landed before the failure
    assert!(host.installed_set().contains("B"));
    assert_eq!(fx.recorded_previous().await, None);

    host.clear_install_failure();
    let ctx = fx.ctx(Arc::clone(&host), catalog());
    let report = bootstrap(&ctx).await.unwrap();

    // Only the missing package is re-attempted
    assert_eq!(report.installed, vec!["C".to_string()]);
    assert_eq!(report.skipped_installs, vec!["B".to_string()]);
    assert_eq!(fx.recorded_previous().await.as_deref(), Some("1.4.0"));
}

#[tokio::test(start_paused = true)]
async fn test_override_file_force_includes_packages() {
    let mut fx = Fixture::new(Some("1.4.0"), "1.4.0").await;
    std::fs::write(
        fx.dir.path().join("extra-packages.txt"),
        "# local extras\nscratchpad\n",
    )
    .unwrap();
    let ctx = fx.ctx(MemoryHost::new(), catalog());

    let report = bootstrap(&ctx).await.unwrap();

    assert_eq!(report.installed, vec!["scratchpad".to_string()]);
    assert_eq!(report.outcome, BootstrapOutcome::Updated);
    assert!(ctx.host.installed_set().contains("scratchpad"));
}

#[tokio::test(start_paused = true)]
async fn test_deferred_removals_are_reported() {
    let mut fx = Fixture::new(Some("1.0.0"), "1.4.0").await;
    let host = MemoryHost::new()
        .with_installed(["A"])
        .with_deferred_removals(true);
    let ctx = fx.ctx(host, catalog());

    let report = bootstrap(&ctx).await.unwrap();

    assert_eq!(report.removed, vec!["A".to_string()]);
    assert_eq!(report.deferred, vec!["A".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_plan_and_status_are_side_effect_free() {
    let mut fx = Fixture::new(None, "1.4.0").await;
    let ctx = fx.ctx(MemoryHost::new(), catalog());

    let report = plan(&ctx).await.unwrap();
    assert_eq!(report.installs, vec!["B".to_string(), "C".to_string()]);
    assert!(report.has_work());

    let state = status(&ctx).await.unwrap();
    assert!(state.fresh_install);
    assert!(state.pending);

    // Nothing mutated, nothing committed
    assert!(ctx.host.calls().is_empty());
    assert_eq!(fx.recorded_previous().await, None);

    // After a real run, status settles
    bootstrap(&ctx).await.unwrap();
    let state = status(&ctx).await.unwrap();
    assert!(!state.pending);
    assert!(!state.fresh_install);
}
