//! Status command implementation

use anyhow::Result;
use serde::Serialize;
use wm_migrate::{owed_migrations, StateStore};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::load_project;

/// Migration status report, as printed by `--output json`
#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub(crate) recorded_version: String,
    pub(crate) running_version: String,
    pub(crate) completed: Vec<String>,
    pub(crate) owed: Vec<OwedMigration>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OwedMigration {
    pub(crate) id: String,
    pub(crate) min_version: String,
    pub(crate) may_skip: bool,
    pub(crate) do_query: bool,
    pub(crate) description: String,
}

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let report = build_report(global).await?;

    match args.output {
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        StatusOutput::Table => print_table(&report),
    }
    Ok(())
}

pub(crate) async fn build_report(global: &GlobalArgs) -> Result<StatusReport> {
    let project = load_project(global)?;
    let runner = project.runner()?;
    let store = project.open_store(global)?;
    let record = store.read().await?.migration_record()?;

    let owed = owed_migrations(runner.catalog(), &record)
        .into_iter()
        .map(|entry| OwedMigration {
            id: entry.id.to_string(),
            min_version: entry.min_version.to_string(),
            may_skip: entry.descriptor.may_skip,
            do_query: entry.descriptor.do_query,
            description: entry.descriptor.description.to_string(),
        })
        .collect();

    Ok(StatusReport {
        recorded_version: record.app_version.to_string(),
        running_version: project.running_version()?.to_string(),
        completed: record.completed.iter().map(ToString::to_string).collect(),
        owed,
    })
}

fn print_table(report: &StatusReport) {
    println!("Recorded version: {}", report.recorded_version);
    println!("Running version:  {}", report.running_version);

    if report.completed.is_empty() {
        println!("Completed migrations: none");
    } else {
        println!("Completed migrations:");
        for id in &report.completed {
            println!("  {id}");
        }
    }

    if report.owed.is_empty() {
        println!("\nNo migrations owed");
        return;
    }

    let id_width = report
        .owed
        .iter()
        .map(|m| m.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    println!("\n{:<id_width$}  {:<8}  {:<5}  {:<5}", "ID", "MIN", "SKIP", "QUERY");
    for m in &report.owed {
        println!(
            "{:<id_width$}  {:<8}  {:<5}  {:<5}",
            m.id,
            m.min_version,
            if m.may_skip { "yes" } else { "no" },
            if m.do_query { "yes" } else { "no" },
        );
    }
    println!("\n{} migration(s) owed", report.owed.len());
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
