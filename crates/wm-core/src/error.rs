//! Error types for wm-core

use thiserror::Error;

/// Core error type for Waymark
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: A version string could not be parsed as semver
    #[error("[C003] Invalid version '{value}': {source}")]
    InvalidVersion {
        value: String,
        source: semver::Error,
    },

    /// C004: IO error
    #[error("[C004] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C005: IO error with file path context
    #[error("[C005] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C006: YAML parse error
    #[error("[C006] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C007: JSON serialization/deserialization error
    #[error("[C007] State file error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
