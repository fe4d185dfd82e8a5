//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use wm_core::{AppVersion, Config};
use wm_migrate::{JsonStateStore, MigrationRunner};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run before the process exits.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; nothing user-facing to print.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project directory and its configuration
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// State file, honouring the `--state` override
    pub(crate) fn state_path(&self, global: &GlobalArgs) -> PathBuf {
        match &global.state {
            Some(path) => path.clone(),
            None => self.config.state_file(&self.root),
        }
    }

    /// Value substituted for `{userdata}`
    pub(crate) fn user_data(&self) -> String {
        self.config.user_data_dir(&self.root).display().to_string()
    }

    pub(crate) fn running_version(&self) -> Result<AppVersion> {
        self.config
            .app_version()
            .context("Invalid app_version in configuration")
    }

    /// Runner over the built-in catalog for the configured version
    pub(crate) fn runner(&self) -> Result<MigrationRunner> {
        let catalog =
            wm_migrate::builtin_catalog().context("Built-in migration catalog is invalid")?;
        Ok(MigrationRunner::new(catalog, self.running_version()?))
    }

    pub(crate) fn open_store(&self, global: &GlobalArgs) -> Result<JsonStateStore> {
        let path = self.state_path(global);
        JsonStateStore::open(&path)
            .with_context(|| format!("Failed to open state file: {}", path.display()))
    }
}

/// Load the project from the global arguments
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let config = match &global.config {
        Some(path) => wm_core::Config::load(path),
        None => wm_core::Config::load_from_dir(&global.project_dir),
    }
    .with_context(|| {
        format!(
            "Failed to load project at: {}",
            global.project_dir.display()
        )
    })?;

    log::debug!(
        "Loaded project at {} (app version {})",
        global.project_dir.display(),
        config.app_version
    );

    Ok(Project {
        root: global.project_dir.clone(),
        config,
    })
}
