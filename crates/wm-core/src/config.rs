//! Configuration types and parsing for waymark.yml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::version::AppVersion;

/// Host application configuration from waymark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Version of the running application
    pub app_version: String,

    /// JSON state file, relative to the project directory
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Value substituted for `{userdata}` in path templates
    #[serde(default = "default_user_data")]
    pub user_data: String,

    /// Maximum number of entries moved concurrently within one transfer
    #[serde(default = "default_transfer_concurrency")]
    pub transfer_concurrency: usize,
}

fn default_state_path() -> String {
    "state.json".to_string()
}

fn default_user_data() -> String {
    "data".to_string()
}

fn default_transfer_concurrency() -> usize {
    4
}

impl Config {
    /// Create a configuration with defaults for everything but the version
    pub fn new(app_version: impl Into<String>) -> Self {
        Self {
            app_version: app_version.into(),
            state_path: default_state_path(),
            user_data: default_user_data(),
            transfer_concurrency: default_transfer_concurrency(),
        }
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for waymark.yml or waymark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("waymark.yml");
        let yaml_path = dir.join("waymark.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        AppVersion::parse(&self.app_version)?;

        if self.state_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "state_path cannot be empty".to_string(),
            });
        }

        if self.transfer_concurrency == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "transfer_concurrency must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Parsed version of the running application
    pub fn app_version(&self) -> CoreResult<AppVersion> {
        AppVersion::parse(&self.app_version)
    }

    /// State file location, resolved against `root`
    pub fn state_file(&self, root: &Path) -> PathBuf {
        resolve_against(root, &self.state_path)
    }

    /// User data directory, resolved against `root`
    pub fn user_data_dir(&self, root: &Path) -> PathBuf {
        resolve_against(root, &self.user_data)
    }
}

fn resolve_against(root: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
