//! Strongly-typed identifiers

use crate::newtype_string::define_id;

define_id! {
    /// Stable identifier of a migration, recorded once the migration settles.
    pub struct MigrationId;
}

define_id! {
    /// Identifier of a discovered game, used as a directory name and path key.
    pub struct GameId;
}

#[cfg(test)]
#[path = "ids_test.rs"]
mod tests;
