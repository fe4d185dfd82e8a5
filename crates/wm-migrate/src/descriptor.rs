//! Static migration declarations

/// The effect a migration has when applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationKind {
    /// Ask for a new download root and move each game's downloads into it
    MoveDownloads,
    /// Rewrite every game's install path with its base directory resolved
    UpdateInstallPaths,
    /// No effect beyond being recorded
    Noop,
}

/// A single migration, declared at build time.
///
/// Position in the catalog is the execution order; it is never re-sorted by
/// `min_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationDescriptor {
    /// Stable identifier recorded once the migration settles
    pub id: &'static str,
    /// Owed while the recorded application version is below this
    pub min_version: &'static str,
    /// Whether the operator may decline while still marking it done
    pub may_skip: bool,
    /// Whether the operator is asked before applying
    pub do_query: bool,
    /// Shown to the operator at the query step
    pub description: &'static str,
    pub kind: MigrationKind,
}
