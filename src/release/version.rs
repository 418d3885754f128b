//! Strict semantic version handling for both release tracks
//!
//! Versions are plain `MAJOR.MINOR.PATCH` only. The `semver` crate does the
//! parsing and ordering; pre-release and build metadata are rejected on top
//! because release artifacts and tags never carry them.

use crate::core::error::{ReleaseResult, VersionError};
use semver::Version;
use std::fmt;
use std::str::FromStr;

/// Bump level for a version resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
  Patch,
  Minor,
  Major,
}

impl BumpLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      BumpLevel::Patch => "patch",
      BumpLevel::Minor => "minor",
      BumpLevel::Major => "major",
    }
  }
}

impl fmt::Display for BumpLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BumpLevel {
  type Err = VersionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "patch" => Ok(BumpLevel::Patch),
      "minor" => Ok(BumpLevel::Minor),
      "major" => Ok(BumpLevel::Major),
      other => Err(VersionError::UnsupportedLevel {
        level: other.to_string(),
      }),
    }
  }
}

/// Parse a strict X.Y.Z version, rejecting pre-release and build metadata
pub fn parse_strict(value: &str) -> ReleaseResult<Version> {
  let parsed = Version::parse(value.trim()).map_err(|_| VersionError::Invalid {
    value: value.to_string(),
  })?;

  if !parsed.pre.is_empty() || !parsed.build.is_empty() {
    return Err(
      VersionError::Invalid {
        value: value.to_string(),
      }
      .into(),
    );
  }

  Ok(parsed)
}

/// Apply a bump level to a version
pub fn bump(version: &Version, level: BumpLevel) -> Version {
  match level {
    BumpLevel::Patch => Version::new(version.major, version.minor, version.patch + 1),
    BumpLevel::Minor => Version::new(version.major, version.minor + 1, 0),
    BumpLevel::Major => Version::new(version.major + 1, 0, 0),
  }
}

/// Resolve the next version from exactly one of a bump level or an explicit target
pub fn resolve_next(current: &Version, level: Option<BumpLevel>, explicit: Option<&str>) -> ReleaseResult<Version> {
  match (level, explicit) {
    (Some(_), Some(_)) | (None, None) => Err(VersionError::AmbiguousInput.into()),
    (None, Some(target)) => parse_strict(target),
    (Some(level), None) => Ok(bump(current, level)),
  }
}

/// Validate an optional override against the on-disk version for tagging
///
/// The override never wins: it must equal the on-disk value exactly, or the
/// resolution fails. `source` names the environment variable for diagnostics.
pub fn resolve_with_override(
  on_disk: &Version,
  override_value: Option<&str>,
  source: &'static str,
) -> ReleaseResult<Version> {
  let Some(raw) = override_value else {
    return Ok(on_disk.clone());
  };

  let requested = parse_strict(raw)?;
  if requested != *on_disk {
    return Err(
      VersionError::OverrideMismatch {
        source,
        on_disk: on_disk.to_string(),
        requested: requested.to_string(),
      }
      .into(),
    );
  }

  Ok(requested)
}
