//! Net-delta resolution

use crate::{MigrationRegistry, WorkQueue};
use extup_types::VersionOrdinal;

/// Compute the net work queue for the half-open range `(previous, current]`
///
/// Every delta whose `since` falls in the range contributes, in ascending
/// order. A package scheduled for removal by an earlier delta and
/// re-added by a later one cancels out (and vice versa): last write wins
/// via mutual cancellation, not by overwriting. Processes are collected
/// over the same range.
///
/// `previous == current` and `previous > current` (downgrade) both yield
/// an empty queue; neither is an error.
#[must_use]
pub fn resolve(
    registry: &MigrationRegistry,
    previous: &VersionOrdinal,
    current: &VersionOrdinal,
) -> WorkQueue {
    let mut queue = WorkQueue::default();

    let in_range = |since: &VersionOrdinal| previous < since && since <= current;

    for delta in registry.deltas().iter().filter(|d| in_range(&d.since)) {
        for package in &delta.removes {
            schedule(&mut queue.removals, &mut queue.installs, package);
        }
        for package in &delta.installs {
            schedule(&mut queue.installs, &mut queue.removals, package);
        }
    }

    queue.processes = registry
        .processes()
        .iter()
        .filter(|p| in_range(&p.since))
        .cloned()
        .collect();

    queue
}

/// Append `package` to `target` unless a pending entry in `opposite`
/// cancels it; cancellation consumes both entries.
pub(crate) fn schedule(target: &mut Vec<String>, opposite: &mut Vec<String>, package: &str) {
    if let Some(pos) = opposite.iter().position(|p| p == package) {
        opposite.remove(pos);
    } else if !target.iter().any(|p| p == package) {
        target.push(package.to_string());
    }
}
