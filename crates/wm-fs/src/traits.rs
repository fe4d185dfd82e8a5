//! Filesystem trait definition

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use crate::error::FsResult;

/// Metadata needed to plan a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStat {
    /// Identifier of the storage volume holding the path
    pub device_id: u64,
    pub is_dir: bool,
}

/// Filesystem primitives used by migrations
///
/// Every operation reports a missing path as [`FsError::NotFound`] and a
/// rename across volumes as [`FsError::CrossDevice`], so callers can
/// normalize those conditions without inspecting OS error codes.
///
/// [`FsError::NotFound`]: crate::FsError::NotFound
/// [`FsError::CrossDevice`]: crate::FsError::CrossDevice
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Query metadata for `path`
    async fn stat(&self, path: &Path) -> FsResult<PathStat>;

    /// Names of the immediate entries of directory `path`
    async fn list_entries(&self, path: &Path) -> FsResult<Vec<OsString>>;

    /// Atomically rename a file or directory
    async fn rename_entry(&self, from: &Path, to: &Path) -> FsResult<()>;

    /// Copy a file or directory tree
    async fn copy_entry(&self, from: &Path, to: &Path) -> FsResult<()>;

    /// Remove a directory and anything left inside it
    async fn remove_directory(&self, path: &Path) -> FsResult<()>;

    /// Create a directory and its parents if missing
    async fn ensure_dir(&self, path: &Path) -> FsResult<()>;

    /// Whether `path` exists
    async fn exists(&self, path: &Path) -> FsResult<bool> {
        match self.stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    async fn stat(&self, path: &Path) -> FsResult<PathStat> {
        (**self).stat(path).await
    }

    async fn list_entries(&self, path: &Path) -> FsResult<Vec<OsString>> {
        (**self).list_entries(path).await
    }

    async fn rename_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        (**self).rename_entry(from, to).await
    }

    async fn copy_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        (**self).copy_entry(from, to).await
    }

    async fn remove_directory(&self, path: &Path) -> FsResult<()> {
        (**self).remove_directory(path).await
    }

    async fn ensure_dir(&self, path: &Path) -> FsResult<()> {
        (**self).ensure_dir(path).await
    }
}
