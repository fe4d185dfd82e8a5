//! The ordered, validated list of known migrations

use std::collections::HashSet;
use wm_core::{AppVersion, MigrationId};

use crate::descriptor::{MigrationDescriptor, MigrationKind};
use crate::error::{MigrateError, MigrateResult};

/// All built-in migrations, in execution order. Append only.
pub static BUILTIN_MIGRATIONS: &[MigrationDescriptor] = &[
    MigrationDescriptor {
        id: "move-downloads-0.16",
        min_version: "0.16.0",
        may_skip: false,
        do_query: true,
        description: "The directory structure for downloads was changed so we need to move them. \
                      You can skip this step but then all downloads will disappear from your \
                      download list. Please note: there will be no progress indication, please \
                      be patient.",
        kind: MigrationKind::MoveDownloads,
    },
    MigrationDescriptor {
        id: "update-install-path-0.16",
        min_version: "0.16.0",
        may_skip: false,
        do_query: false,
        description: "install path is now in a different spot of the store",
        kind: MigrationKind::UpdateInstallPaths,
    },
];

/// A descriptor with its id and version parsed
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: MigrationId,
    pub min_version: AppVersion,
    pub descriptor: MigrationDescriptor,
}

/// Validated migration list
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Validate `descriptors`, keeping their order.
    ///
    /// Fails on an empty or duplicate id and on any unparsable `min_version`.
    pub fn new(descriptors: Vec<MigrationDescriptor>) -> MigrateResult<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let id = MigrationId::try_new(descriptor.id).ok_or_else(|| {
                MigrateError::InvalidCatalog {
                    message: "migration id cannot be empty".to_string(),
                }
            })?;
            if !seen.insert(descriptor.id) {
                return Err(MigrateError::InvalidCatalog {
                    message: format!("duplicate migration id '{}'", descriptor.id),
                });
            }
            let min_version = AppVersion::parse(descriptor.min_version)?;
            entries.push(CatalogEntry {
                id,
                min_version,
                descriptor,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The validated built-in catalog
pub fn builtin_catalog() -> MigrateResult<Catalog> {
    Catalog::new(BUILTIN_MIGRATIONS.to_vec())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
