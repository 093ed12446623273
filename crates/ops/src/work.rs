//! Shared queue preparation helpers

use extup_errors::{Error, OpsError};
use extup_resolver::{parse_override_list, WorkQueue};
use std::collections::BTreeSet;
use std::path::Path;

/// Read the override list; a missing file is an empty list
pub(crate) async fn load_overrides(path: &Path) -> Result<Vec<String>, Error> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(parse_override_list(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(OpsError::OverrideListUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()),
    }
}

/// Drop installs already present and removals not present
///
/// Returns the skipped (install, removal) package names. This runs at
/// the orchestrator boundary to keep the resolver pure.
pub(crate) fn filter_installed(
    queue: &mut WorkQueue,
    installed: &BTreeSet<String>,
) -> (Vec<String>, Vec<String>) {
    let mut skipped_installs = Vec::new();
    queue.installs.retain(|package| {
        if installed.contains(package) {
            skipped_installs.push(package.clone());
            false
        } else {
            true
        }
    });

    let mut skipped_removals = Vec::new();
    queue.removals.retain(|package| {
        if installed.contains(package) {
            true
        } else {
            skipped_removals.push(package.clone());
            false
        }
    });

    (skipped_installs, skipped_removals)
}
