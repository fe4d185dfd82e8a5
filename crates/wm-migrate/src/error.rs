//! Error types for wm-migrate

use thiserror::Error;
use wm_core::CoreError;
use wm_fs::FsError;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Operator declined to proceed (M001)
    #[error("[M001] Migration cancelled by user")]
    Cancelled,

    /// Migration catalog is malformed (M002)
    #[error("[M002] Invalid migration catalog: {message}")]
    InvalidCatalog { message: String },

    /// Config, version or state file error (M003)
    #[error("[M003] {0}")]
    Core(#[from] CoreError),

    /// Filesystem or transfer failure (M004)
    #[error("[M004] {0}")]
    Fs(#[from] FsError),

    /// Prompt service failure (M005)
    #[error("[M005] Prompt failed: {message}")]
    Prompt { message: String },

    /// A migration step failed on its own terms (M006)
    #[error("[M006] Migration '{id}' failed: {message}")]
    StepFailed { id: String, message: String },
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MigrateError::Cancelled)
    }

    /// Full description including every `source()` in the chain
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let line = err.to_string();
            if !text.contains(&line) {
                text.push_str("\ncaused by: ");
                text.push_str(&line);
            }
            source = err.source();
        }
        text
    }
}
