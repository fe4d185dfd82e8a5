//! Error types for wm-fs

use std::io;
use std::path::Path;
use thiserror::Error;

/// Filesystem operation errors
#[derive(Error, Debug)]
pub enum FsError {
    /// Path does not exist (F001)
    #[error("[F001] Path not found: {path}")]
    NotFound { path: String },

    /// Rename attempted across storage volumes (F002)
    #[error("[F002] Cannot rename '{from}' to '{to}': paths are on different devices")]
    CrossDevice { from: String, to: String },

    /// Any other I/O failure (F003)
    #[error("[F003] {op} failed for '{path}': {source}")]
    Io {
        op: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for FsError
pub type FsResult<T> = Result<T, FsError>;

impl FsError {
    /// Classify an `io::Error` raised by `op` on `path`
    pub fn from_io(op: &'static str, path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound {
                path: path.display().to_string(),
            },
            _ => FsError::Io {
                op,
                path: path.display().to_string(),
                source: err,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }

    pub fn is_cross_device(&self) -> bool {
        matches!(self, FsError::CrossDevice { .. })
    }
}
