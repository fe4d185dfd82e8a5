//! Narrow the catalog down to the migrations still owed

use wm_core::MigrationRecord;

use crate::catalog::{Catalog, CatalogEntry};

/// Migrations owed for `record`, in declaration order.
///
/// An entry is owed when the recorded version is below its `min_version`
/// and its id has not been completed. A completed id is never owed again,
/// whatever the recorded version.
pub fn owed_migrations<'a>(catalog: &'a Catalog, record: &MigrationRecord) -> Vec<&'a CatalogEntry> {
    catalog
        .entries()
        .iter()
        .filter(|entry| record.app_version < entry.min_version)
        .filter(|entry| !record.is_completed(entry.id.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "version_gate_test.rs"]
mod tests;
