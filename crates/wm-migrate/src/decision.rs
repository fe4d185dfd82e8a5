//! Operator decisions: whether to apply a migration, and what to do after one fails

use std::path::{Path, PathBuf};

use crate::descriptor::MigrationDescriptor;
use crate::error::{MigrateError, MigrateResult};
use crate::prompt::{Prompt, PromptKind, PromptRequest};

pub const CANCEL: &str = "Cancel";
pub const SKIP: &str = "Skip";
pub const CONTINUE: &str = "Continue";
pub const IGNORE: &str = "Ignore";
pub const QUIT: &str = "Quit";

const QUERY_TITLE: &str = "Migration necessary";
const FAILURE_TITLE: &str = "Migration failed";
const FAILURE_PREAMBLE: &str =
    "A migration step failed. You should quit now and resolve the cause of the issue.\n";

/// Answer to the query-before-apply prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDecision {
    /// Apply, then record as completed
    Apply,
    /// Do not apply, but record as completed
    Skip,
    /// Stop the whole run
    Cancel,
}

/// Answer to the continue-after-failure prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDecision {
    /// Leave the migration unrecorded and move on
    Ignore,
    /// Abort the run with the original error
    Quit,
}

/// Reduces prompt answers to control-flow decisions
pub struct UserDecisionGate<'a> {
    prompt: &'a dyn Prompt,
}

impl<'a> UserDecisionGate<'a> {
    pub fn new(prompt: &'a dyn Prompt) -> Self {
        Self { prompt }
    }

    /// Ask whether to apply `descriptor`.
    ///
    /// Migrations with `do_query == false` are applied without asking.
    pub async fn query_migration(
        &self,
        descriptor: &MigrationDescriptor,
    ) -> MigrateResult<QueryDecision> {
        if !descriptor.do_query {
            return Ok(QueryDecision::Apply);
        }

        let options: &[&str] = if descriptor.may_skip {
            &[CANCEL, SKIP, CONTINUE]
        } else {
            &[CANCEL, CONTINUE]
        };
        let choice = self
            .choose(PromptRequest {
                kind: PromptKind::Info,
                title: QUERY_TITLE,
                message: descriptor.description,
                options,
            })
            .await?;

        Ok(match choice {
            SKIP => QueryDecision::Skip,
            CONTINUE => QueryDecision::Apply,
            _ => QueryDecision::Cancel,
        })
    }

    /// Show `error` and ask whether to ignore it or quit
    pub async fn query_continue(&self, error: &MigrateError) -> MigrateResult<FailureDecision> {
        let message = format!("{FAILURE_PREAMBLE}{}", error.describe());
        let choice = self
            .choose(PromptRequest {
                kind: PromptKind::Error,
                title: FAILURE_TITLE,
                message: &message,
                options: &[IGNORE, QUIT],
            })
            .await?;

        Ok(if choice == IGNORE {
            FailureDecision::Ignore
        } else {
            FailureDecision::Quit
        })
    }

    /// Show a message with a single acknowledgement button
    pub async fn notify(
        &self,
        kind: PromptKind,
        title: &str,
        message: &str,
        button: &'static str,
    ) -> MigrateResult<()> {
        self.choose(PromptRequest {
            kind,
            title,
            message,
            options: &[button],
        })
        .await?;
        Ok(())
    }

    /// Ask for a directory, `None` if the operator gave up
    pub async fn select_directory(
        &self,
        title: &str,
        default: &Path,
    ) -> MigrateResult<Option<PathBuf>> {
        self.prompt.select_directory(title, default).await
    }

    /// Ask and map the reply back onto one of the offered labels
    async fn choose(&self, request: PromptRequest<'_>) -> MigrateResult<&'static str> {
        let reply = self.prompt.ask(&request).await?;
        request
            .options
            .iter()
            .copied()
            .find(|option| *option == reply)
            .ok_or_else(|| MigrateError::Prompt {
                message: format!(
                    "'{reply}' is not one of the offered options ({})",
                    request.options.join(", ")
                ),
            })
    }
}

#[cfg(test)]
#[path = "decision_test.rs"]
mod tests;
