//! Schema artifact mutation
//!
//! The schema track versions a JSON artifact named after its own version
//! (`schemas/envgen.schema.v<V>.json`) with the same version embedded as the
//! single `x-envgen-schema-version` field, plus a one-line `SCHEMA_VERSION`
//! file. A bump is a rename-with-content-edit, split into a validating
//! prepare step (no writes) and an apply step, so the changelog can rotate
//! between the two and a prepare failure never leaves artifacts touched.

use crate::core::error::{ReleaseResult, ResultExt, SchemaError, VersionError};
use crate::core::layout::RepoLayout;
use crate::release::version::parse_strict;
use crate::utils::write_atomic;
use regex::Regex;
use semver::Version;
use std::fs;
use std::path::PathBuf;

fn marker_re() -> Regex {
  Regex::new(r#"("x-envgen-schema-version"\s*:\s*")([^"]*)(")"#).expect("static regex")
}

/// Read and validate the current schema version from SCHEMA_VERSION
pub fn read_current_version(layout: &RepoLayout) -> ReleaseResult<Version> {
  let path = layout.schema_version_file();
  if !path.exists() {
    return Err(SchemaError::VersionFileMissing { path }.into());
  }

  let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  parse_strict(text.trim())
}

/// A fully validated schema bump, ready to apply
#[derive(Debug)]
pub struct SchemaBump {
  pub old_version: Version,
  pub new_version: Version,
  pub old_path: PathBuf,
  pub new_path: PathBuf,
  version_file: PathBuf,
  updated_text: String,
}

/// Validate a schema bump and rewrite the artifact text, without writing
pub fn prepare_bump(layout: &RepoLayout, new_version: &Version) -> ReleaseResult<SchemaBump> {
  let old_version = read_current_version(layout)?;
  if old_version == *new_version {
    return Err(
      VersionError::NoChange {
        version: old_version.to_string(),
      }
      .into(),
    );
  }

  let old_path = layout.schema_artifact(&old_version.to_string());
  let new_path = layout.schema_artifact(&new_version.to_string());

  if !old_path.exists() {
    return Err(SchemaError::CurrentArtifactMissing { path: old_path }.into());
  }
  if new_path.exists() {
    return Err(SchemaError::TargetArtifactExists { path: new_path }.into());
  }

  let text = fs::read_to_string(&old_path).with_context(|| format!("Failed to read {}", old_path.display()))?;
  let updated_text = rewrite_marker(&text, new_version)?;

  Ok(SchemaBump {
    old_version,
    new_version: new_version.clone(),
    old_path,
    new_path,
    version_file: layout.schema_version_file(),
    updated_text,
  })
}

impl SchemaBump {
  /// Write the new artifact, drop the old one, flip SCHEMA_VERSION last
  pub fn apply(&self, dry_run: bool) -> ReleaseResult<()> {
    if dry_run {
      println!("[dry-run] write schema file: {}", self.new_path.display());
      println!("[dry-run] remove schema file: {}", self.old_path.display());
      println!("[dry-run] update {} -> {}", self.version_file.display(), self.new_version);
      return Ok(());
    }

    write_atomic(&self.new_path, &self.updated_text)?;
    fs::remove_file(&self.old_path).with_context(|| format!("Failed to remove {}", self.old_path.display()))?;
    write_atomic(&self.version_file, &format!("{}\n", self.new_version))?;

    Ok(())
  }
}

/// Rewrite the single embedded version marker in schema JSON text
pub fn rewrite_marker(text: &str, new_version: &Version) -> ReleaseResult<String> {
  let re = marker_re();
  let found = re.find_iter(text).count();
  if found != 1 {
    return Err(SchemaError::MarkerCount { found }.into());
  }

  let updated = re
    .replace(text, |caps: &regex::Captures<'_>| {
      format!("{}{}{}", &caps[1], new_version, &caps[3])
    })
    .into_owned();

  if let Err(e) = serde_json::from_str::<serde_json::Value>(&updated) {
    return Err(
      SchemaError::InvalidJson {
        detail: e.to_string(),
      }
      .into(),
    );
  }

  Ok(updated)
}
