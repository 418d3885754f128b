//! Repository layout for the release-managed project
//!
//! All release-relevant paths hang off a single root so commands resolve them
//! once and pass the layout by reference.

use std::path::PathBuf;

/// Default directory for downloaded tarballs and sidecar files
pub const SOURCE_DIR: &str = ".homebrew";

/// Files and directories the release flow reads and rewrites
#[derive(Debug, Clone)]
pub struct RepoLayout {
  /// Repository root (absolute path)
  pub root: PathBuf,
}

impl RepoLayout {
  pub fn at(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Crate manifest carrying [package].version
  pub fn manifest(&self) -> PathBuf {
    self.root.join("Cargo.toml")
  }

  /// Crate changelog
  pub fn changelog(&self) -> PathBuf {
    self.root.join("CHANGELOG.md")
  }

  /// Schema changelog
  pub fn schema_changelog(&self) -> PathBuf {
    self.root.join("SCHEMA_CHANGELOG.md")
  }

  /// Single-line file holding the current schema version
  pub fn schema_version_file(&self) -> PathBuf {
    self.root.join("SCHEMA_VERSION")
  }

  /// Directory of versioned schema artifacts
  pub fn schema_dir(&self) -> PathBuf {
    self.root.join("schemas")
  }

  /// Versioned schema artifact for a given version
  pub fn schema_artifact(&self, version: &str) -> PathBuf {
    self.schema_dir().join(format!("envgen.schema.v{}.json", version))
  }

  /// Default download/sidecar directory
  pub fn source_dir(&self) -> PathBuf {
    self.root.join(SOURCE_DIR)
  }

  /// Default sidecar path for a tag
  pub fn source_sidecar(&self, tag: &str) -> PathBuf {
    self.source_dir().join(format!("source-{}.json", sanitize_tag(tag)))
  }
}

/// Replace filename-hostile characters in a tag with underscores
pub fn sanitize_tag(tag: &str) -> String {
  tag
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
        c
      } else {
        '_'
      }
    })
    .collect()
}
