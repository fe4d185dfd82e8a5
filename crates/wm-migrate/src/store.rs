//! State store consumed by the runner and by migration steps

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use wm_core::{AppState, AppVersion, CoreError, GameId, MigrationId};

use crate::error::MigrateResult;

/// Persistent application state
///
/// Every mutation is durable when the call returns.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Snapshot of the current state
    async fn read(&self) -> MigrateResult<AppState>;

    /// Record `id` as completed. Recording an id twice is a no-op.
    async fn record_completed(&self, id: &MigrationId) -> MigrateResult<()>;

    async fn record_app_version(&self, version: &AppVersion) -> MigrateResult<()>;

    async fn set_download_path(&self, path: &str) -> MigrateResult<()>;

    async fn set_install_path(&self, game: &GameId, path: &str) -> MigrateResult<()>;
}

/// State store backed by a JSON file, rewritten atomically on every change
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    state: Mutex<AppState>,
}

impl JsonStateStore {
    /// Load the state at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> MigrateResult<Self> {
        let path = path.into();
        let state = AppState::load(&path)?;
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` and, if it reports a change, write the file.
    ///
    /// The lock is held until the write finishes so saves land in call order.
    async fn update(&self, change: impl FnOnce(&mut AppState) -> bool + Send) -> MigrateResult<()> {
        let mut state = self.state.lock().await;
        if !change(&mut state) {
            return Ok(());
        }

        let snapshot = state.clone();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || snapshot.save(&path))
            .await
            .map_err(|e| CoreError::Io(io::Error::other(e)))??;
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn read(&self) -> MigrateResult<AppState> {
        Ok(self.state.lock().await.clone())
    }

    async fn record_completed(&self, id: &MigrationId) -> MigrateResult<()> {
        self.update(|state| state.complete_migration(id)).await
    }

    async fn record_app_version(&self, version: &AppVersion) -> MigrateResult<()> {
        self.update(|state| {
            state.set_app_version(version);
            true
        })
        .await
    }

    async fn set_download_path(&self, path: &str) -> MigrateResult<()> {
        self.update(|state| {
            state.set_download_path(path);
            true
        })
        .await
    }

    async fn set_install_path(&self, game: &GameId, path: &str) -> MigrateResult<()> {
        self.update(|state| {
            state.set_install_path(game, path);
            true
        })
        .await
    }
}

/// State store held in memory only
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<AppState>,
}

impl MemoryStateStore {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn into_inner(self) -> AppState {
        self.state.into_inner()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn read(&self) -> MigrateResult<AppState> {
        Ok(self.state.lock().await.clone())
    }

    async fn record_completed(&self, id: &MigrationId) -> MigrateResult<()> {
        self.state.lock().await.complete_migration(id);
        Ok(())
    }

    async fn record_app_version(&self, version: &AppVersion) -> MigrateResult<()> {
        self.state.lock().await.set_app_version(version);
        Ok(())
    }

    async fn set_download_path(&self, path: &str) -> MigrateResult<()> {
        self.state.lock().await.set_download_path(path);
        Ok(())
    }

    async fn set_install_path(&self, game: &GameId, path: &str) -> MigrateResult<()> {
        self.state.lock().await.set_install_path(game, path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
