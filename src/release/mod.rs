//! Release-track logic: version resolution, changelog rotation, artifact
//! mutation and tag lifecycle

pub mod changelog;
pub mod manifest;
pub mod schema;
pub mod tags;
pub mod version;

use crate::core::layout::RepoLayout;
use semver::Version;
use std::path::PathBuf;

/// An independently versioned artifact stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
  /// The crate itself, versioned in Cargo.toml
  Crate,
  /// The schema artifact, versioned in SCHEMA_VERSION + schemas/
  Schema,
}

impl Track {
  /// Tag name for a version on this track
  pub fn tag_name(&self, version: &Version) -> String {
    match self {
      Track::Crate => format!("v{}", version),
      Track::Schema => format!("schema-v{}", version),
    }
  }

  /// Annotated tag message
  pub fn tag_message(&self, tag: &str) -> String {
    match self {
      Track::Crate => format!("release {}", tag),
      Track::Schema => format!("schema release {}", tag),
    }
  }

  /// Changelog file for this track
  pub fn changelog_path(&self, layout: &RepoLayout) -> PathBuf {
    match self {
      Track::Crate => layout.changelog(),
      Track::Schema => layout.schema_changelog(),
    }
  }

  /// Default changelog sub-headings for this track
  pub fn default_sections(&self) -> &'static [&'static str] {
    match self {
      Track::Crate => changelog::CRATE_SECTIONS,
      Track::Schema => changelog::SCHEMA_SECTIONS,
    }
  }
}
