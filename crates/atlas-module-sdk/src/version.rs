//! Four-component module version.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A module version with four numeric components.
///
/// Ordering is lexicographic over `(major, minor, patch, build)`: each
/// component is compared numerically, left to right, stopping at the first
/// difference. The derived `Ord` on the field order implements exactly that.
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ModuleVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

impl ModuleVersion {
    /// Create a version from its four components.
    pub const fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError {
    input: String,
}

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid module version `{}`", self.input)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for ModuleVersion {
    type Err = ParseVersionError;

    /// Parse a `major.minor.patch.build` string. All four components are
    /// required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_string(),
        };

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return Err(err());
        }

        let mut components = [0u32; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| err())?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}
