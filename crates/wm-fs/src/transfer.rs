//! Directory transfer: move the contents of one directory into another.
//!
//! Entries are renamed when both directories sit on the same device and
//! copied otherwise. A rename that the OS rejects as cross-device is retried
//! as a copy for that entry alone. The source directory is removed once every
//! entry has been moved; if any entry fails, the others still finish and the
//! source is kept. A missing source is not an error: there is simply
//! nothing left to move.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::ffi::OsString;
use std::path::Path;

use crate::error::{FsError, FsResult};
use crate::traits::FileSystem;

/// What a transfer did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Entries moved by rename
    pub renamed: usize,
    /// Entries moved by copy (including cross-device fallbacks)
    pub copied: usize,
    /// The source did not exist, nothing was touched
    pub source_missing: bool,
}

impl TransferReport {
    fn source_missing() -> Self {
        Self {
            source_missing: true,
            ..Self::default()
        }
    }

    pub fn moved(&self) -> usize {
        self.renamed + self.copied
    }
}

/// Moves a directory's contents to a new location
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn transfer(&self, source: &Path, destination: &Path) -> FsResult<TransferReport>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryOp {
    Rename,
    Copy,
}

/// [`Transfer`] implementation over any [`FileSystem`]
///
/// Assumes exclusive access to both paths for the duration of a transfer.
#[derive(Debug, Clone)]
pub struct PathTransferEngine<F> {
    fs: F,
    concurrency: usize,
}

impl<F: FileSystem> PathTransferEngine<F> {
    /// Create an engine dispatching at most `concurrency` entry operations at once
    pub fn new(fs: F, concurrency: usize) -> Self {
        Self {
            fs,
            concurrency: concurrency.max(1),
        }
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    async fn run(&self, source: &Path, destination: &Path) -> FsResult<TransferReport> {
        let source_stat = self.fs.stat(source).await?;
        self.fs.ensure_dir(destination).await?;
        let destination_stat = self.fs.stat(destination).await?;

        let op = if source_stat.device_id == destination_stat.device_id {
            EntryOp::Rename
        } else {
            EntryOp::Copy
        };

        let entries = self.fs.list_entries(source).await?;
        log::debug!(
            "Transferring {} entries from {} to {} ({:?})",
            entries.len(),
            source.display(),
            destination.display(),
            op
        );

        let pending: Vec<_> = entries
            .into_iter()
            .map(|name| self.transfer_entry(op, source, destination, name))
            .collect();
        // Every entry settles before the first error is returned.
        let results: Vec<FsResult<EntryOp>> = stream::iter(pending)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        let ops = results.into_iter().collect::<FsResult<Vec<EntryOp>>>()?;

        match self.fs.remove_directory(source).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let renamed = ops.iter().filter(|op| **op == EntryOp::Rename).count();
        Ok(TransferReport {
            renamed,
            copied: ops.len() - renamed,
            source_missing: false,
        })
    }

    async fn transfer_entry(
        &self,
        op: EntryOp,
        source: &Path,
        destination: &Path,
        name: OsString,
    ) -> FsResult<EntryOp> {
        let from = source.join(&name);
        let to = destination.join(&name);

        if op == EntryOp::Copy {
            self.fs.copy_entry(&from, &to).await?;
            return Ok(EntryOp::Copy);
        }

        match self.fs.rename_entry(&from, &to).await {
            Ok(()) => Ok(EntryOp::Rename),
            Err(FsError::CrossDevice { .. }) => {
                log::debug!(
                    "{} is on another device, copying instead of renaming",
                    from.display()
                );
                self.fs.copy_entry(&from, &to).await?;
                Ok(EntryOp::Copy)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<F: FileSystem> Transfer for PathTransferEngine<F> {
    async fn transfer(&self, source: &Path, destination: &Path) -> FsResult<TransferReport> {
        match self.run(source, destination).await {
            Ok(report) => {
                log::info!(
                    "Moved {} entries from {} to {}",
                    report.moved(),
                    source.display(),
                    destination.display()
                );
                Ok(report)
            }
            Err(e) if e.is_not_found() => {
                if self.fs.exists(source).await? {
                    return Err(e);
                }
                log::info!("Nothing to transfer, {} does not exist", source.display());
                Ok(TransferReport::source_missing())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "transfer_test.rs"]
mod tests;
