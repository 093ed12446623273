//! Dry-run plan and status queries
//!
//! Both read the same state a bootstrap run would, but never sequence
//! operations and never commit.

use crate::work;
use crate::{OpsCtx, PlanReport, StatusReport};
use extup_errors::Error;
use extup_host::PackageHost;
use extup_resolver::{apply_overrides, resolve};

/// Compute what a bootstrap run would do right now
///
/// # Errors
///
/// Returns an error if the progress record or the host's installed set
/// is unreadable.
pub async fn plan<H: PackageHost>(ctx: &OpsCtx<H>) -> Result<PlanReport, Error> {
    let record = ctx.progress.load().await?;

    let mut queue = resolve(&ctx.registry, &record.previous, &record.current);
    let overrides = work::load_overrides(&ctx.config.override_file()).await?;
    apply_overrides(&mut queue, &overrides);

    let installed = ctx.host.installed().await?;
    let (skipped_installs, skipped_removals) = work::filter_installed(&mut queue, &installed);

    Ok(PlanReport {
        previous: record.previous,
        current: record.current,
        removals: queue.removals,
        installs: queue.installs,
        processes: queue.processes.iter().map(|p| p.since.clone()).collect(),
        skipped_installs,
        skipped_removals,
    })
}

/// Report recorded progress and whether work is pending
///
/// # Errors
///
/// Returns an error if the progress record is unreadable.
pub async fn status<H: PackageHost>(ctx: &OpsCtx<H>) -> Result<StatusReport, Error> {
    let report = plan(ctx).await?;
    Ok(StatusReport {
        fresh_install: report.previous.is_zero(),
        pending: report.has_work(),
        previous: report.previous,
        current: report.current,
    })
}
