//! Migration runner
//!
//! Drives the owed migrations through query, apply and commit, one at a time
//! and in declaration order. Each settled migration is recorded before the
//! next one starts, so an interrupted run resumes where it stopped.

use serde::Serialize;
use wm_core::{AppVersion, MigrationId};

use crate::apply::{apply, MigrationContext};
use crate::catalog::{Catalog, CatalogEntry};
use crate::decision::{FailureDecision, QueryDecision, UserDecisionGate};
use crate::error::MigrateResult;
use crate::recovery::{classify, Recovery};
use crate::version_gate::owed_migrations;

/// A migration whose failure the operator chose to ignore
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredMigration {
    pub id: MigrationId,
    pub error: String,
}

/// What a run did before it ended
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Applied and recorded
    pub applied: Vec<MigrationId>,
    /// Recorded without being applied
    pub skipped: Vec<MigrationId>,
    /// Failed, left unrecorded
    pub ignored: Vec<IgnoredMigration>,
    /// Where the operator cancelled, if they did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<MigrationId>,
}

/// How a run ended.
///
/// An aborted run is not an outcome: `run` returns the error that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    Cancelled(RunSummary),
}

impl RunOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::Completed(summary) | RunOutcome::Cancelled(summary) => summary,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled(_))
    }
}

/// How one migration settled
enum Settled {
    Applied,
    Skipped,
    Ignored(String),
    Cancelled,
}

/// Runs the owed part of a catalog
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    catalog: Catalog,
    running_version: AppVersion,
}

impl MigrationRunner {
    /// Create a runner for an application at `running_version`
    pub fn new(catalog: Catalog, running_version: AppVersion) -> Self {
        Self {
            catalog,
            running_version,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run every owed migration.
    ///
    /// Returns `Err` only when the run aborts: the operator chose to quit
    /// after a failure (the failure itself is returned), or a prompt or the
    /// state store failed.
    pub async fn run(&self, ctx: &MigrationContext<'_>) -> MigrateResult<RunOutcome> {
        let state = ctx.store.read().await?;
        let record = state.migration_record()?;
        let owed = owed_migrations(&self.catalog, &record);
        log::info!(
            "{} migration(s) owed (recorded version {}, running {})",
            owed.len(),
            record.app_version,
            self.running_version
        );

        let gate = UserDecisionGate::new(ctx.prompt);
        let mut summary = RunSummary::default();

        for entry in owed {
            match self.settle(entry, ctx, &gate).await? {
                Settled::Applied => summary.applied.push(entry.id.clone()),
                Settled::Skipped => summary.skipped.push(entry.id.clone()),
                Settled::Ignored(error) => summary.ignored.push(IgnoredMigration {
                    id: entry.id.clone(),
                    error,
                }),
                Settled::Cancelled => {
                    log::info!("Migration run cancelled at {}", entry.id);
                    summary.cancelled_at = Some(entry.id.clone());
                    return Ok(RunOutcome::Cancelled(summary));
                }
            }
        }

        if summary.ignored.is_empty() && record.app_version < self.running_version {
            ctx.store.record_app_version(&self.running_version).await?;
        }
        Ok(RunOutcome::Completed(summary))
    }

    async fn settle(
        &self,
        entry: &CatalogEntry,
        ctx: &MigrationContext<'_>,
        gate: &UserDecisionGate<'_>,
    ) -> MigrateResult<Settled> {
        let descriptor = &entry.descriptor;

        match gate.query_migration(descriptor).await? {
            QueryDecision::Cancel => return Ok(Settled::Cancelled),
            QueryDecision::Skip => {
                log::info!("Skipping migration {}", entry.id);
                ctx.store.record_completed(&entry.id).await?;
                return Ok(Settled::Skipped);
            }
            QueryDecision::Apply => {}
        }

        log::info!("Applying migration {}", entry.id);
        let error = match apply(descriptor.kind, ctx).await {
            Ok(()) => {
                ctx.store.record_completed(&entry.id).await?;
                return Ok(Settled::Applied);
            }
            Err(error) => error,
        };

        if classify(&error) == Recovery::Cancel {
            return Ok(Settled::Cancelled);
        }

        match gate.query_continue(&error).await? {
            FailureDecision::Ignore => {
                let description = error.describe();
                log::warn!("Ignoring failed migration {}: {}", entry.id, description);
                Ok(Settled::Ignored(description))
            }
            FailureDecision::Quit => {
                log::error!("Migration {} failed, aborting: {}", entry.id, error);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
