//! Persisted application state
//!
//! The state file is a JSON document holding the migration record
//! (`app.app_version`, `app.migrations`) next to the settings that
//! migrations rewrite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::ids::{GameId, MigrationId};
use crate::version::AppVersion;

/// Default template for the download root
pub const DEFAULT_DOWNLOAD_ROOT: &str = "{userdata}/downloads";

/// Whole application state as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// When this state was last written
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    /// Version and migration bookkeeping
    #[serde(default)]
    pub app: AppSection,

    /// User settings touched by migrations
    #[serde(default)]
    pub settings: Settings,
}

/// Version and migration bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSection {
    /// Version last recorded as having completed all owed migrations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// Ids of migrations that need not be offered again
    #[serde(default)]
    pub migrations: Vec<MigrationId>,
}

/// User settings touched by migrations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub downloads: DownloadSettings,

    /// Games discovered on this machine
    #[serde(default)]
    pub games: Vec<GameId>,

    #[serde(default)]
    pub mods: ModSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Download root, possibly containing placeholders
    #[serde(default = "default_download_root")]
    pub path: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            path: default_download_root(),
        }
    }
}

fn default_download_root() -> String {
    DEFAULT_DOWNLOAD_ROOT.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModSettings {
    /// Per-game path templates
    #[serde(default)]
    pub paths: BTreeMap<GameId, GamePaths>,
}

/// Path templates for one game; unset entries fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<String>,
}

/// Parsed view of the migration bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationRecord {
    pub app_version: AppVersion,
    pub completed: BTreeSet<MigrationId>,
}

impl MigrationRecord {
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create an empty state
    pub fn new() -> Self {
        Self {
            updated_at: Utc::now(),
            app: AppSection::default(),
            settings: Settings::default(),
        }
    }

    /// Load state from a file path, returning an empty state if the file is missing
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let state: AppState = serde_json::from_str(&content)?;
        Ok(state)
    }

    /// Save state to a file path atomically
    ///
    /// Writes a PID-suffixed temp file next to the target, then renames it
    /// over the target.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::IoWithPath {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&temp_path, &json).map_err(|e| CoreError::IoWithPath {
            path: temp_path.display().to_string(),
            source: e,
        })?;
        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            }
        })?;
        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Parse the version bookkeeping into a [`MigrationRecord`]
    pub fn migration_record(&self) -> CoreResult<MigrationRecord> {
        Ok(MigrationRecord {
            app_version: AppVersion::parse_recorded(self.app.app_version.as_deref())?,
            completed: self.app.migrations.iter().cloned().collect(),
        })
    }

    /// Mark a migration as completed.
    ///
    /// Returns `false` if the id was already present; the list never holds
    /// duplicates.
    pub fn complete_migration(&mut self, id: &MigrationId) -> bool {
        if self.app.migrations.contains(id) {
            return false;
        }
        self.app.migrations.push(id.clone());
        self.touch();
        true
    }

    pub fn set_app_version(&mut self, version: &AppVersion) {
        self.app.app_version = Some(version.to_string());
        self.touch();
    }

    pub fn set_download_path(&mut self, path: impl Into<String>) {
        self.settings.downloads.path = path.into();
        self.touch();
    }

    /// Store a resolved install path for a game
    pub fn set_install_path(&mut self, game: &GameId, path: impl Into<String>) {
        self.settings
            .mods
            .paths
            .entry(game.clone())
            .or_default()
            .install = Some(path.into());
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
