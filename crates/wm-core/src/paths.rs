//! Path templates for per-game directories
//!
//! Paths in the state file are stored as templates such as
//! `{userdata}/{game}/downloads`. Placeholder names are matched
//! case-insensitively; unknown placeholders are left untouched.

use std::collections::BTreeMap;

use crate::ids::GameId;
use crate::state::GamePaths;

/// Default template for a game's base directory
pub const DEFAULT_BASE: &str = "{userdata}/{game}";

/// Default template for a game's download directory
pub const DEFAULT_DOWNLOAD: &str = "{base}/downloads";

/// Default template for a game's install directory
pub const DEFAULT_INSTALL: &str = "{base}/mods";

/// Which per-game path to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Base,
    Download,
    Install,
}

impl PathKind {
    fn default_template(self) -> &'static str {
        match self {
            PathKind::Base => DEFAULT_BASE,
            PathKind::Download => DEFAULT_DOWNLOAD,
            PathKind::Install => DEFAULT_INSTALL,
        }
    }

    fn template(self, paths: &GamePaths) -> Option<&str> {
        match self {
            PathKind::Base => paths.base.as_deref(),
            PathKind::Download => paths.download.as_deref(),
            PathKind::Install => paths.install.as_deref(),
        }
    }
}

/// Placeholder values, keyed case-insensitively
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder value, builder style
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }
}

/// Substitute `{name}` placeholders in `template`.
pub fn format_template(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve one of a game's directories.
///
/// Falls back to the default template when the game has no entry or the
/// entry leaves `kind` unset. `{base}` is resolved first and made available
/// to the download and install templates.
pub fn resolve_path(
    kind: PathKind,
    paths: &BTreeMap<GameId, GamePaths>,
    game: &GameId,
    user_data: &str,
) -> String {
    let mut vars = TemplateVars::new()
        .with("userdata", user_data)
        .with("game", game.as_str());
    if kind != PathKind::Base {
        let base = resolve_path(PathKind::Base, paths, game, user_data);
        vars.insert("base", base);
    }

    let template = paths
        .get(game)
        .and_then(|p| kind.template(p))
        .unwrap_or_else(|| kind.default_template());
    format_template(template, &vars)
}

#[cfg(test)]
#[path = "paths_test.rs"]
mod tests;
