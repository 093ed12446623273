//! Integration tests for the step sequencer and package operations

use extup_events::{AppEvent, MigrateEvent, PackageEvent};
use extup_host::{HostCall, MemoryHost, RemovalOutcome};
use extup_install::{PackageOperation, SequencerConfig, StepSequencer};
use extup_resolver::{process_action, resolve, MigrationRegistry, WorkQueue};
use extup_types::VersionOrdinal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn v(s: &str) -> VersionOrdinal {
    s.parse().unwrap()
}

fn fast_config() -> SequencerConfig {
    SequencerConfig::default().with_settle_delay(Duration::from_millis(10))
}

#[tokio::test(start_paused = true)]
async fn test_phases_run_removes_then_installs_then_processes() {
    let mut registry = MigrationRegistry::new();
    // Registered out of order on purpose
    let ran = Arc::new(AtomicUsize::new(0));
    let ran_in_action = Arc::clone(&ran);
    registry.register_process(
        v("1.0.0"),
        process_action(move || {
            let ran = Arc::clone(&ran_in_action);
            async move {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }),
    );
    registry.register_delta(v("1.0.0"), ["old-linter"], ["todo-review", "spell-check"]);

    let queue = resolve(&registry, &VersionOrdinal::zero(), &v("1.0.0"));
    let host = MemoryHost::new().with_installed(["old-linter"]);

    let summary = StepSequencer::new(&host, queue, &fast_config())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.removed, vec!["old-linter".to_string()]);
    assert_eq!(
        summary.installed,
        vec!["spell-check".to_string(), "todo-review".to_string()]
    );
    assert_eq!(summary.processed, 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);

    // The host never saw an install before the removal finished
    let calls = host.calls();
    let remove_pos = calls
        .iter()
        .position(|c| matches!(c, HostCall::Remove { .. }))
        .unwrap();
    let first_install = calls
        .iter()
        .position(|c| matches!(c, HostCall::Install { .. }))
        .unwrap();
    assert!(remove_pos < first_install);
}

#[tokio::test(start_paused = true)]
async fn test_empty_queue_completes_immediately() {
    let host = MemoryHost::new();
    let summary = StepSequencer::new(&host, WorkQueue::default(), &fast_config())
        .run()
        .await
        .unwrap();
    assert_eq!(summary.total(), 0);
    assert!(host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_install_reenables_only_affected_package() {
    let host = MemoryHost::new().with_installed(["present"]);
    let operation = PackageOperation::new(&host, Duration::from_millis(10));

    // Present and enabled: disable affects it, so it is re-enabled after
    operation.install("present").await.unwrap();
    assert!(host
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::Reenable { package } if package == "present")));

    // Absent: disable affects nothing, no re-enable happens
    operation.install("fresh").await.unwrap();
    assert!(!host
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::Reenable { package } if package == "fresh")));
}

#[tokio::test(start_paused = true)]
async fn test_remove_of_already_disabled_package_skips_reenable() {
    let host = MemoryHost::new()
        .with_installed(["git-gutter"])
        .with_disabled(["git-gutter"]);
    let operation = PackageOperation::new(&host, Duration::from_millis(10));

    let outcome = operation.remove("git-gutter").await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Completed);
    assert!(!host
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::Reenable { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_deferred_removal_skips_reenable() {
    let host = MemoryHost::new()
        .with_installed(["markdown-extended"])
        .with_deferred_removals(true);
    let (tx, mut rx) = extup_events::channel();
    let operation =
        PackageOperation::new(&host, Duration::from_millis(10)).with_event_sender(tx);

    let outcome = operation.remove("markdown-extended").await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Deferred);
    assert!(!host
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::Reenable { .. })));

    // The completion event reports the deferral distinctly
    let mut saw_deferred = false;
    while let Ok(event) = rx.try_recv() {
        if let AppEvent::Package(PackageEvent::Removed { deferred, .. }) = event {
            saw_deferred = deferred;
        }
    }
    assert!(saw_deferred);
}

#[tokio::test(start_paused = true)]
async fn test_completed_removal_reenables_affected_package() {
    let host = MemoryHost::new().with_installed(["old-theme"]);
    let operation = PackageOperation::new(&host, Duration::from_millis(10));

    let outcome = operation.remove("old-theme").await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Completed);
    assert!(host
        .calls()
        .iter()
        .any(|c| matches!(c, HostCall::Reenable { package } if package == "old-theme")));
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_is_imposed_around_operations() {
    let host = MemoryHost::new().with_installed(["present"]);
    let operation = PackageOperation::new(&host, Duration::from_millis(1000));

    // Disable settles once, re-enable settles again
    let start = tokio::time::Instant::now();
    operation.install("present").await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(2000));

    // No re-enable path settles only once
    let start = tokio::time::Instant::now();
    operation.install("fresh").await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_failure_aborts_queue_without_later_steps() {
    let mut registry = MigrationRegistry::new();
    registry.register_delta(
        v("1.0.0"),
        Vec::<String>::new(),
        ["alpha", "broken", "omega"],
    );
    let queue = resolve(&registry, &VersionOrdinal::zero(), &v("1.0.0"));

    let host = MemoryHost::new();
    host.fail_install_of("broken");

    let result = StepSequencer::new(&host, queue, &fast_config()).run().await;
    assert!(result.is_err());

    let installs: Vec<_> = host
        .calls()
        .iter()
        .filter_map(|c| match c {
            HostCall::Install { package } => Some(package.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(installs, vec!["alpha".to_string(), "broken".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_migrate_events_bracket_each_process() {
    let mut registry = MigrationRegistry::new();
    registry.register_process(v("1.0.0"), process_action(|| async { Ok(()) }));
    registry.register_process(v("1.2.0"), process_action(|| async { Ok(()) }));
    let queue = resolve(&registry, &VersionOrdinal::zero(), &v("1.2.0"));

    let host = MemoryHost::new();
    let (tx, mut rx) = extup_events::channel();
    StepSequencer::new(&host, queue, &fast_config())
        .with_event_sender(tx)
        .run()
        .await
        .unwrap();

    let mut sinces = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let AppEvent::Migrate(MigrateEvent::ProcessCompleted { since }) = event {
            sinces.push(since);
        }
    }
    assert_eq!(sinces, vec![v("1.0.0"), v("1.2.0")]);
}
