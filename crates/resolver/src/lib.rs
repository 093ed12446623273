#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Version-delta resolution for the extup bootstrap orchestrator
//!
//! The registry holds an ordered table of (since-version, add-set,
//! remove-set) package deltas and an ordered table of (since-version,
//! migration-callback) entries. Given the previously-recorded version and
//! the current one, `resolve` computes the net work queue: packages to
//! remove, packages to install, and migrations to run, with conflicting
//! entries cancelling each other out.
//!
//! Resolution is pure: filtering against the host's installed set happens
//! at the orchestrator boundary, not here.

mod overrides;
mod queue;
mod registry;
mod resolve;

pub use overrides::{apply_overrides, parse_override_list};
pub use queue::WorkQueue;
pub use registry::{
    process_action, MigrationEntry, MigrationRegistry, ProcessAction, ProcessEntry, ProcessToken,
};
pub use resolve::resolve;
