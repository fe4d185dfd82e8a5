//! Migrate command implementation

use anyhow::{Context, Result};
use wm_fs::{LocalFileSystem, PathTransferEngine};
use wm_migrate::{MigrationContext, Prompt, RunOutcome, RunSummary, ScriptedPrompt};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{load_project, ExitCode};
use crate::prompt::TerminalPrompt;

/// Exit code when the operator cancelled before all migrations settled
const EXIT_CANCELLED: i32 = 2;

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let runner = project.runner()?;
    let store = project.open_store(global)?;

    let prompt: Box<dyn Prompt> = match &args.answers {
        Some(path) => {
            let script = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read answers file: {}", path.display()))?;
            Box::new(ScriptedPrompt::from_script(&script))
        }
        None => Box::new(TerminalPrompt::new()),
    };

    let fs = LocalFileSystem::new();
    let transfer =
        PathTransferEngine::new(LocalFileSystem::new(), project.config.transfer_concurrency);
    let user_data = project.user_data();
    let ctx = MigrationContext {
        store: &store,
        prompt: prompt.as_ref(),
        fs: &fs,
        transfer: &transfer,
        user_data: &user_data,
    };

    match runner.run(&ctx).await {
        Ok(RunOutcome::Completed(summary)) => {
            print_summary(&summary, global.verbose);
            if summary.ignored.is_empty() {
                println!("Migrations complete (version {})", project.running_version()?);
            } else {
                println!(
                    "Migrations finished with {} ignored failure(s); version not recorded",
                    summary.ignored.len()
                );
            }
            Ok(())
        }
        Ok(RunOutcome::Cancelled(summary)) => {
            print_summary(&summary, global.verbose);
            if let Some(id) = &summary.cancelled_at {
                println!("Migration cancelled at {id}; remaining migrations will run next time");
            }
            Err(ExitCode(EXIT_CANCELLED).into())
        }
        Err(err) => {
            eprintln!("Migration aborted: {}", err.describe());
            Err(ExitCode(1).into())
        }
    }
}

fn print_summary(summary: &RunSummary, verbose: bool) {
    if summary.applied.is_empty() && summary.skipped.is_empty() && summary.ignored.is_empty() {
        if verbose || summary.cancelled_at.is_none() {
            println!("No migrations applied");
        }
        return;
    }
    for id in &summary.applied {
        println!("  ✓ {id}");
    }
    for id in &summary.skipped {
        println!("  - {id} (skipped)");
    }
    for ignored in &summary.ignored {
        println!("  ✗ {} (ignored)", ignored.id);
        if verbose {
            for line in ignored.error.lines() {
                println!("      {line}");
            }
        }
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
