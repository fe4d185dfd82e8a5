//! wm-migrate - Versioned migration engine for Waymark
//!
//! Decides which migrations are owed for the recorded application version,
//! asks the operator before applying them, runs them strictly in declaration
//! order and records each one as soon as it settles.

pub mod apply;
pub mod catalog;
pub mod decision;
pub mod descriptor;
pub mod error;
pub mod prompt;
pub mod recovery;
pub mod runner;
pub mod store;
pub mod version_gate;

#[cfg(test)]
pub(crate) mod test_utils;

pub use apply::MigrationContext;
pub use catalog::{builtin_catalog, Catalog, CatalogEntry, BUILTIN_MIGRATIONS};
pub use decision::{FailureDecision, QueryDecision, UserDecisionGate};
pub use descriptor::{MigrationDescriptor, MigrationKind};
pub use error::{MigrateError, MigrateResult};
pub use prompt::{Prompt, PromptKind, PromptRequest, ScriptedPrompt};
pub use recovery::Recovery;
pub use runner::{IgnoredMigration, MigrationRunner, RunOutcome, RunSummary};
pub use store::{JsonStateStore, MemoryStateStore, StateStore};
pub use version_gate::owed_migrations;
