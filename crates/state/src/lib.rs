#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Durable state for the extup bootstrap orchestrator
//!
//! Persistence is a set of named JSON key-value documents under a state
//! directory, modeled on the host editor's settings storage: `load`
//! returns an in-memory document, `save` flushes it back synchronously.
//! The progress record lives in one such document and is the only entity
//! the orchestrator itself writes.

mod document;
mod progress;

pub use document::{SettingsDoc, SettingsStore};
pub use progress::{ProgressStore, CURRENT_VERSION_KEY, PREVIOUS_VERSION_KEY};
