//! Local disk implementation of [`FileSystem`] on top of `tokio::fs`

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::ffi::OsString;
use std::io;
use std::path::Path;

use crate::error::{FsError, FsResult};
use crate::traits::{FileSystem, PathStat};

/// Filesystem backend for the local machine
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn stat(&self, path: &Path) -> FsResult<PathStat> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| FsError::from_io("stat", path, e))?;
        Ok(PathStat {
            device_id: device_id(&meta, path),
            is_dir: meta.is_dir(),
        })
    }

    async fn list_entries(&self, path: &Path) -> FsResult<Vec<OsString>> {
        let mut dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| FsError::from_io("list", path, e))?;
        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| FsError::from_io("list", path, e))?
        {
            names.push(entry.file_name());
        }
        names.sort();
        Ok(names)
    }

    async fn rename_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        tokio::fs::rename(from, to).await.map_err(|e| {
            if e.kind() == io::ErrorKind::CrossesDevices {
                FsError::CrossDevice {
                    from: from.display().to_string(),
                    to: to.display().to_string(),
                }
            } else {
                FsError::from_io("rename", from, e)
            }
        })
    }

    async fn copy_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        copy_recursive(from, to).await
    }

    async fn remove_directory(&self, path: &Path) -> FsResult<()> {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|e| FsError::from_io("remove", path, e))
    }

    async fn ensure_dir(&self, path: &Path) -> FsResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| FsError::from_io("create directory", path, e))
    }
}

/// Copy a tree without following links; a link is recreated as a link
fn copy_recursive<'a>(from: &'a Path, to: &'a Path) -> BoxFuture<'a, FsResult<()>> {
    Box::pin(async move {
        let meta = tokio::fs::symlink_metadata(from)
            .await
            .map_err(|e| FsError::from_io("copy", from, e))?;

        if meta.file_type().is_symlink() {
            return copy_link(from, to).await;
        }
        if !meta.is_dir() {
            tokio::fs::copy(from, to)
                .await
                .map_err(|e| FsError::from_io("copy", from, e))?;
            return Ok(());
        }

        tokio::fs::create_dir_all(to)
            .await
            .map_err(|e| FsError::from_io("create directory", to, e))?;
        let mut dir = tokio::fs::read_dir(from)
            .await
            .map_err(|e| FsError::from_io("copy", from, e))?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| FsError::from_io("copy", from, e))?
        {
            let child_from = entry.path();
            let child_to = to.join(entry.file_name());
            copy_recursive(&child_from, &child_to).await?;
        }
        Ok(())
    })
}

#[cfg(unix)]
async fn copy_link(from: &Path, to: &Path) -> FsResult<()> {
    let target = tokio::fs::read_link(from)
        .await
        .map_err(|e| FsError::from_io("read link", from, e))?;
    tokio::fs::symlink(&target, to)
        .await
        .map_err(|e| FsError::from_io("create link", to, e))
}

#[cfg(windows)]
async fn copy_link(from: &Path, to: &Path) -> FsResult<()> {
    let target = tokio::fs::read_link(from)
        .await
        .map_err(|e| FsError::from_io("read link", from, e))?;
    // A dangling link has no metadata; recreate it as a file link.
    let points_to_dir = tokio::fs::metadata(from)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    let created = if points_to_dir {
        tokio::fs::symlink_dir(&target, to).await
    } else {
        tokio::fs::symlink_file(&target, to).await
    };
    created.map_err(|e| FsError::from_io("create link", to, e))
}

#[cfg(not(any(unix, windows)))]
async fn copy_link(from: &Path, _to: &Path) -> FsResult<()> {
    Err(FsError::Io {
        op: "copy link",
        path: from.display().to_string(),
        source: io::Error::new(io::ErrorKind::Unsupported, "symbolic links are not supported"),
    })
}

#[cfg(unix)]
fn device_id(meta: &std::fs::Metadata, _path: &Path) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.dev()
}

// Without a portable device number, paths sharing a prefix (drive letter or
// UNC share) are treated as one volume. A wrong guess is caught by the
// rename fallback in the transfer engine.
#[cfg(not(unix))]
fn device_id(_meta: &std::fs::Metadata, path: &Path) -> u64 {
    use std::hash::{Hash, Hasher};

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    if let Some(prefix) = absolute.components().next() {
        prefix.as_os_str().to_ascii_lowercase().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
