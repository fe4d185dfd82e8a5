//! Semantic versions of the application

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A parsed semantic version.
///
/// Equality and ordering follow semver precedence, so `0.9.0 < 0.16.0`,
/// `0.16.0-alpha.1 < 0.16.0`, and build metadata is ignored
/// (`0.16.0+build.7 == 0.16.0`). Display keeps the metadata.
#[derive(Debug, Clone)]
pub struct AppVersion(semver::Version);

impl AppVersion {
    /// Version assumed when nothing has been recorded yet.
    pub const INITIAL: &'static str = "0.0.0";

    /// Parse a version string, surrounding whitespace allowed.
    pub fn parse(value: &str) -> CoreResult<Self> {
        semver::Version::parse(value.trim())
            .map(Self)
            .map_err(|source| CoreError::InvalidVersion {
                value: value.to_string(),
                source,
            })
    }

    /// The `0.0.0` version.
    pub fn initial() -> Self {
        Self(semver::Version::new(0, 0, 0))
    }

    /// Parse an optional recorded version, treating absence as [`AppVersion::INITIAL`].
    pub fn parse_recorded(value: Option<&str>) -> CoreResult<Self> {
        match value {
            Some(v) => Self::parse(v),
            None => Ok(Self::initial()),
        }
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

impl PartialEq for AppVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AppVersion {}

impl PartialOrd for AppVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AppVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_precedence(&other.0)
    }
}

impl Hash for AppVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.major.hash(state);
        self.0.minor.hash(state);
        self.0.patch.hash(state);
        self.0.pre.hash(state);
    }
}

impl Default for AppVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl FromStr for AppVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for AppVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AppVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
