//! wm-core - Core library for Waymark
//!
//! This crate provides the shared types used by every Waymark component:
//! identifiers, semantic versions, the `waymark.yml` configuration, path
//! templates, and the persisted application state that carries the
//! migration record.

pub mod config;
pub mod error;
pub mod ids;
mod newtype_string;
pub mod paths;
pub mod state;
pub mod version;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use ids::{GameId, MigrationId};
pub use paths::{format_template, resolve_path, PathKind, TemplateVars};
pub use state::{AppState, GamePaths, MigrationRecord, Settings};
pub use version::AppVersion;
