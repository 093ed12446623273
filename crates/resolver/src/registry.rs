//! Migration registry
//!
//! Holds the static delta and process tables, both kept sorted ascending
//! by `since` with registration order preserved on ties. The registry is
//! an explicit value constructed once at startup and passed by reference
//! into the resolver; there is no ambient process-wide table.

use extup_errors::Result;
use extup_types::VersionOrdinal;
use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// One-shot migration callback
pub type ProcessAction = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap an async closure as a `ProcessAction`
pub fn process_action<F, Fut>(action: F) -> ProcessAction
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move || Box::pin(action()))
}

/// A version-triggered change to the desired package set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationEntry {
    pub since: VersionOrdinal,
    pub removes: BTreeSet<String>,
    pub installs: BTreeSet<String>,
}

/// A version-triggered configuration migration
#[derive(Clone)]
pub struct ProcessEntry {
    pub since: VersionOrdinal,
    pub token: ProcessToken,
    pub action: ProcessAction,
}

impl fmt::Debug for ProcessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessEntry")
            .field("since", &self.since)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Identifies a registered process entry; only used for
/// registration-time chaining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessToken(usize);

/// Ordered tables of package deltas and migration processes
#[derive(Debug, Default)]
pub struct MigrationRegistry {
    deltas: Vec<MigrationEntry>,
    processes: Vec<ProcessEntry>,
}

impl MigrationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package delta taking effect at `since`
    pub fn register_delta<R, I, S, T>(&mut self, since: VersionOrdinal, removes: R, installs: I)
    where
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.deltas.push(MigrationEntry {
            since,
            removes: removes.into_iter().map(Into::into).collect(),
            installs: installs.into_iter().map(Into::into).collect(),
        });
        // Stable sort keeps registration order on equal `since`
        self.deltas.sort_by(|a, b| a.since.cmp(&b.since));
    }

    /// Register a migration process taking effect at `since`
    pub fn register_process(&mut self, since: VersionOrdinal, action: ProcessAction) -> ProcessToken {
        let token = ProcessToken(self.processes.len());
        self.processes.push(ProcessEntry {
            since,
            token,
            action,
        });
        self.processes.sort_by(|a, b| a.since.cmp(&b.since));
        token
    }

    /// Delta table, ascending by `since`
    #[must_use]
    pub fn deltas(&self) -> &[MigrationEntry] {
        &self.deltas
    }

    /// Process table, ascending by `since`
    #[must_use]
    pub fn processes(&self) -> &[ProcessEntry] {
        &self.processes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty() && self.processes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionOrdinal {
        s.parse().unwrap()
    }

    #[test]
    fn test_deltas_sorted_by_since() {
        let mut registry = MigrationRegistry::new();
        registry.register_delta(v("1.4.0"), ["a"], ["b"]);
        registry.register_delta(v("1.0.0"), Vec::<String>::new(), ["c"]);
        registry.register_delta(v("1.2.0"), ["d"], Vec::<String>::new());

        let sinces: Vec<_> = registry.deltas().iter().map(|d| d.since.clone()).collect();
        assert_eq!(sinces, vec![v("1.0.0"), v("1.2.0"), v("1.4.0")]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut registry = MigrationRegistry::new();
        registry.register_delta(v("1.0.0"), Vec::<String>::new(), ["first"]);
        registry.register_delta(v("1.0.0"), Vec::<String>::new(), ["second"]);

        let installs: Vec<_> = registry
            .deltas()
            .iter()
            .map(|d| d.installs.iter().next().unwrap().clone())
            .collect();
        assert_eq!(installs, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_process_tokens_identify_entries() {
        let mut registry = MigrationRegistry::new();
        let t1 = registry.register_process(v("1.2.0"), process_action(|| async { Ok(()) }));
        let t2 = registry.register_process(v("1.0.0"), process_action(|| async { Ok(()) }));
        assert_ne!(t1, t2);

        // Sorted by since regardless of registration order
        let sinces: Vec<_> = registry
            .processes()
            .iter()
            .map(|p| p.since.clone())
            .collect();
        assert_eq!(sinces, vec![v("1.0.0"), v("1.2.0")]);
    }
}
