//! Transfer command implementation

use anyhow::{Context, Result};
use wm_fs::{LocalFileSystem, PathTransferEngine, Transfer};

use crate::cli::TransferArgs;

/// Execute the transfer command
pub async fn execute(args: &TransferArgs) -> Result<()> {
    let engine = PathTransferEngine::new(LocalFileSystem::new(), args.concurrency);
    let report = engine
        .transfer(&args.source, &args.destination)
        .await
        .with_context(|| {
            format!(
                "Failed to move {} to {}",
                args.source.display(),
                args.destination.display()
            )
        })?;

    if report.source_missing {
        println!("Nothing to transfer: {} does not exist", args.source.display());
    } else {
        println!(
            "Moved {} entries to {} ({} renamed, {} copied)",
            report.moved(),
            args.destination.display(),
            report.renamed,
            report.copied
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "transfer_test.rs"]
mod tests;
