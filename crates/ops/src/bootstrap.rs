//! Bootstrap run implementation
//!
//! One run: load the progress record, resolve the net work queue, apply
//! the override list, filter against the host's installed set, drain the
//! queue sequentially, and commit the new previous version. The commit
//! happens exactly once, only after the queue drained successfully or
//! was determined empty; any failure aborts with no commit, leaving the
//! run safely re-triggerable.

use crate::work;
use crate::{BootstrapReport, OpsCtx};
use extup_errors::Error;
use extup_events::{AppEvent, BootstrapEvent, EventEmitter, PackageEvent};
use extup_host::PackageHost;
use extup_install::{SequencerConfig, StepSequencer};
use extup_resolver::{apply_overrides, resolve};
use extup_types::BootstrapOutcome;
use std::time::Instant;

/// Run the bootstrap orchestration
///
/// # Errors
///
/// Returns an error if the progress record is unreadable (missing
/// `current_version`, malformed version strings), if any host primitive
/// fails mid-queue, or if the final commit cannot be persisted. No
/// partial progress is ever committed.
pub async fn bootstrap<H: PackageHost>(ctx: &OpsCtx<H>) -> Result<BootstrapReport, Error> {
    let start = Instant::now();

    let record = ctx.progress.load().await?;
    ctx.emit(AppEvent::Bootstrap(BootstrapEvent::Started {
        previous: record.previous.clone(),
        current: record.current.clone(),
    }));

    let mut queue = resolve(&ctx.registry, &record.previous, &record.current);
    let overrides = work::load_overrides(&ctx.config.override_file()).await?;
    if !overrides.is_empty() {
        ctx.emit_debug(format!(
            "force-including {} package(s) from {}",
            overrides.len(),
            ctx.config.override_file().display()
        ));
    }
    apply_overrides(&mut queue, &overrides);

    // Filtering runs on every attempt, not just the first, so an
    // interrupted run never re-issues completed installs or removals.
    let installed = ctx.host.installed().await?;
    let (skipped_installs, skipped_removals) = work::filter_installed(&mut queue, &installed);
    for package in &skipped_installs {
        ctx.emit(AppEvent::Package(PackageEvent::SkippedAlreadyInstalled {
            package: package.clone(),
        }));
    }
    for package in &skipped_removals {
        ctx.emit(AppEvent::Package(PackageEvent::SkippedNotInstalled {
            package: package.clone(),
        }));
    }

    ctx.emit(AppEvent::Bootstrap(BootstrapEvent::Planned {
        removals: queue.removals.clone(),
        installs: queue.installs.clone(),
        processes: queue.processes.len(),
    }));

    let sequencer_config = SequencerConfig::default().with_settle_delay(ctx.config.settle_delay());
    let sequencer =
        StepSequencer::new(&ctx.host, queue, &sequencer_config).with_event_sender(ctx.tx.clone());
    let summary = match sequencer.run().await {
        Ok(summary) => summary,
        Err(e) => {
            ctx.emit(AppEvent::Bootstrap(BootstrapEvent::Failed {
                message: e.to_string(),
            }));
            return Err(e);
        }
    };

    // The single commit point: the queue drained or was empty
    ctx.progress.save(&record.current).await?;

    let outcome = if summary.total() == 0 {
        BootstrapOutcome::NothingToDo
    } else if record.is_fresh_install() {
        BootstrapOutcome::Installed
    } else {
        BootstrapOutcome::Updated
    };

    let duration = start.elapsed();
    ctx.emit(AppEvent::Bootstrap(BootstrapEvent::Completed {
        outcome,
        removed: summary.removed.len(),
        installed: summary.installed.len(),
        processed: summary.processed,
        duration,
    }));

    Ok(BootstrapReport {
        outcome,
        previous: record.previous,
        current: record.current,
        removed: summary.removed,
        deferred: summary.deferred,
        installed: summary.installed,
        processes_run: summary.processed,
        skipped_installs,
        skipped_removals,
        duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
    })
}
