//! Shared fixtures for unit tests

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use wm_fs::{FsError, FsResult, Transfer, TransferReport};

use crate::descriptor::{MigrationDescriptor, MigrationKind};

/// A no-op migration applied without asking
pub(crate) fn descriptor(id: &'static str, min_version: &'static str) -> MigrationDescriptor {
    MigrationDescriptor {
        id,
        min_version,
        may_skip: false,
        do_query: false,
        description: "",
        kind: MigrationKind::Noop,
    }
}

/// Transfer that records its calls instead of touching the disk
#[derive(Default)]
pub(crate) struct RecordingTransfer {
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    fail_with: Option<String>,
}

impl RecordingTransfer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every call fails with an I/O error carrying `message`
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transfer for RecordingTransfer {
    async fn transfer(&self, source: &Path, destination: &Path) -> FsResult<TransferReport> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), destination.to_path_buf()));
        match &self.fail_with {
            Some(message) => Err(FsError::Io {
                op: "rename",
                path: source.display().to_string(),
                source: io::Error::new(io::ErrorKind::Other, message.clone()),
            }),
            None => Ok(TransferReport {
                renamed: 1,
                ..TransferReport::default()
            }),
        }
    }
}
