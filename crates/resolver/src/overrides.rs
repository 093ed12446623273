//! Environment override list
//!
//! An optional line-delimited text file lists extra package names to
//! force-include: one trimmed name per non-blank line, `#` starts a
//! comment. Overrides are applied with the same cancellation rule as
//! delta resolution, so a forced install cancels a pending removal of
//! the same package instead of racing it.

use crate::resolve::schedule;
use crate::WorkQueue;

/// Parse the override file format into package names
#[must_use]
pub fn parse_override_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Force-include the given packages into the queue's install list
pub fn apply_overrides(queue: &mut WorkQueue, force_install: &[String]) {
    for package in force_install {
        schedule(&mut queue.installs, &mut queue.removals, package);
    }
}
