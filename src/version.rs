//! Format version registry.
//!
//! Every file records the version of the format it was written with so that
//! newer writers can introduce non-forward-compatible encodings without
//! confusing older readers. Version names follow the release of the engine
//! that first wrote that version of the format.
//!
//! The table is append-only: a released name is part of the on-disk contract
//! and is never removed, renumbered or reused for a different version. New
//! versions go at the end of [`VERSIONS`] and [`FormatVersion::CURRENT`] moves
//! to the newest entry.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A released version of the file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FormatVersion {
    name: &'static str,
    major: u32,
    minor: u32,
}

impl FormatVersion {
    /// First released version of the format
    pub const V_0_11: FormatVersion = FormatVersion::new("0.11", 0, 11);

    /// Adds the dictionary-v2 and RLE-v2 encodings
    pub const V_0_12: FormatVersion = FormatVersion::new("0.12", 0, 12);

    /// The version new files are written with unless told otherwise
    pub const CURRENT: FormatVersion = FormatVersion::V_0_12;

    const fn new(name: &'static str, major: u32, minor: u32) -> Self {
        Self { name, major, minor }
    }

    /// Human readable name, as stored in files and settings
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Major version number
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor version number
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Whether this is the version returned by [`current`]
    pub fn is_current(&self) -> bool {
        *self == Self::CURRENT
    }
}

impl Ord for FormatVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

impl PartialOrd for FormatVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for FormatVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// All registered versions, oldest first.
pub static VERSIONS: &[FormatVersion] = &[FormatVersion::V_0_11, FormatVersion::V_0_12];

/// Requested version name is not in the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown ORC version {0}")]
pub struct UnknownVersion(pub String);

/// Look a version up by its exact name.
///
/// There is no fallback: writing a file under an assumed version would break
/// the forward-compatibility promise made to readers.
pub fn resolve(name: &str) -> Result<FormatVersion, UnknownVersion> {
    VERSIONS
        .iter()
        .find(|v| v.name == name)
        .copied()
        .ok_or_else(|| UnknownVersion(name.to_string()))
}

/// Look a version up by the numbers a file records for it.
pub fn by_numbers(major: u32, minor: u32) -> Option<FormatVersion> {
    VERSIONS
        .iter()
        .find(|v| v.major == major && v.minor == minor)
        .copied()
}

/// The version to write when none was requested.
pub fn current() -> FormatVersion {
    FormatVersion::CURRENT
}
