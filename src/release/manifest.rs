//! Byte-preserving version rewrite for the crate manifest
//!
//! The version value is replaced with a line-level edit rather than a
//! document rewrite: comments, ordering, whitespace and quoting elsewhere in
//! the manifest must survive untouched. `toml_edit` validates the document
//! before and after the edit.

use crate::core::error::{ManifestError, ReleaseResult, ResultExt, VersionError};
use crate::release::version::parse_strict;
use crate::utils::write_atomic;
use regex::Regex;
use semver::Version;
use std::fs;
use std::path::Path;

fn version_line_re() -> Regex {
  Regex::new(r#"^(\s*version\s*=\s*")([^"]+)(".*?)(\r?\n?)$"#).expect("static regex")
}

/// Read and validate [package].version
pub fn read_version(path: &Path) -> ReleaseResult<Version> {
  let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let doc: toml_edit::DocumentMut = text.parse().map_err(|e: toml_edit::TomlError| ManifestError::Unparseable {
    detail: e.to_string(),
  })?;

  let version = doc
    .get("package")
    .and_then(|p| p.get("version"))
    .and_then(|v| v.as_str())
    .ok_or_else(|| ManifestError::VersionFieldMissing {
      path: path.to_path_buf(),
    })?;

  parse_strict(version)
}

/// Rewrite [package].version in place, returning (old, new)
pub fn update_version(path: &Path, new_version: &Version, dry_run: bool) -> ReleaseResult<(Version, Version)> {
  let old_version = read_version(path)?;
  if old_version == *new_version {
    return Err(
      VersionError::NoChange {
        version: old_version.to_string(),
      }
      .into(),
    );
  }

  let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let updated = replace_version_value(&text, path, new_version)?;

  // The edit is textual; prove the document still parses before persisting
  if let Err(e) = updated.parse::<toml_edit::DocumentMut>() {
    return Err(
      ManifestError::CorruptedAfterEdit {
        detail: e.to_string(),
      }
      .into(),
    );
  }

  if dry_run {
    println!(
      "[dry-run] update {} version {} -> {}",
      path.display(),
      old_version,
      new_version
    );
  } else {
    write_atomic(path, &updated)?;
  }

  Ok((old_version, new_version.clone()))
}

/// Replace only the version value on the first version line of [package]
fn replace_version_value(text: &str, path: &Path, new_version: &Version) -> ReleaseResult<String> {
  let lines: Vec<&str> = text.split_inclusive('\n').collect();

  let package_start = lines
    .iter()
    .position(|line| line.trim() == "[package]")
    .ok_or_else(|| ManifestError::PackageSectionMissing {
      path: path.to_path_buf(),
    })?;

  let re = version_line_re();
  let mut version_index = None;

  for (index, line) in lines.iter().enumerate().skip(package_start + 1) {
    let stripped = line.trim();
    if stripped.starts_with('[') && stripped.ends_with(']') {
      break;
    }
    if re.is_match(line) {
      version_index = Some(index);
      break;
    }
  }

  let version_index = version_index.ok_or_else(|| ManifestError::VersionFieldMissing {
    path: path.to_path_buf(),
  })?;

  let replaced = re.replace(lines[version_index], |caps: &regex::Captures<'_>| {
    format!("{}{}{}{}", &caps[1], new_version, &caps[3], &caps[4])
  });

  let mut updated = String::with_capacity(text.len());
  for (index, line) in lines.iter().enumerate() {
    if index == version_index {
      updated.push_str(&replaced);
    } else {
      updated.push_str(line);
    }
  }

  Ok(updated)
}
