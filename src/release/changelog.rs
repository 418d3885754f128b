//! Changelog rotation
//!
//! Changelogs follow the Keep-a-Changelog shape: one `## [Unreleased]`
//! section first, then dated `## [X.Y.Z] - YYYY-MM-DD` release sections.
//! Rotation closes the unreleased section into a dated release section and
//! re-opens an empty unreleased section with the same sub-headings. The body
//! is moved verbatim, never duplicated.

use crate::core::error::{ChangelogError, ReleaseResult, ResultExt};
use crate::utils::write_atomic;
use chrono::NaiveDate;
use regex::Regex;
use semver::Version;
use std::fs;
use std::path::Path;

/// Default sub-headings for the crate changelog
pub const CRATE_SECTIONS: &[&str] = &["Added", "Changed", "Deprecated", "Removed", "Fixed", "Security"];

/// Default sub-headings for the schema changelog
pub const SCHEMA_SECTIONS: &[&str] = &["Added", "Changed", "Deprecated", "Removed", "Fixed", "Compatibility"];

fn unreleased_heading_re() -> Regex {
  Regex::new(r"(?m)^## \[Unreleased\][ \t]*\r?\n").expect("static regex")
}

fn section_heading_re() -> Regex {
  Regex::new(r"(?m)^## ").expect("static regex")
}

fn sub_heading_re() -> Regex {
  Regex::new(r"(?m)^### (.+)$").expect("static regex")
}

/// Rotate the unreleased section of the changelog at `path`
pub fn rotate(
  path: &Path,
  new_version: &Version,
  default_sections: &[&str],
  allow_empty: bool,
  dry_run: bool,
) -> ReleaseResult<()> {
  let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let today = chrono::Local::now().date_naive();
  let updated = rotate_text(&text, path, new_version, default_sections, allow_empty, today)?;

  if dry_run {
    println!("[dry-run] rotate changelog section in {} for {}", path.display(), new_version);
  } else {
    write_atomic(path, &updated)?;
  }

  Ok(())
}

/// Pure rotation over changelog text
///
/// Exposed separately so the transform is testable without touching disk.
pub fn rotate_text(
  text: &str,
  path: &Path,
  new_version: &Version,
  default_sections: &[&str],
  allow_empty: bool,
  date: NaiveDate,
) -> ReleaseResult<String> {
  let heading = unreleased_heading_re()
    .find(text)
    .ok_or_else(|| ChangelogError::MissingUnreleased {
      path: path.to_path_buf(),
    })?;

  let body_start = heading.end();
  let body_end = section_heading_re()
    .find_at(text, body_start)
    .map(|m| m.start())
    .unwrap_or(text.len());
  let body = &text[body_start..body_end];

  let mut headings: Vec<String> = sub_heading_re()
    .captures_iter(body)
    .map(|c| c[1].to_string())
    .collect();
  if headings.is_empty() {
    headings = default_sections.iter().map(|s| s.to_string()).collect();
  }

  if !body_has_entries(body) && !allow_empty {
    return Err(
      ChangelogError::EmptyUnreleased {
        path: path.to_path_buf(),
      }
      .into(),
    );
  }

  let mut unreleased_block = String::from("## [Unreleased]\n\n");
  for h in &headings {
    unreleased_block.push_str(&format!("### {}\n\n", h));
  }
  let unreleased_block = format!("{}\n", unreleased_block.trim_end());

  let clean_body = body.trim_matches('\n');
  let mut release_block = format!("## [{}] - {}\n\n", new_version, date.format("%Y-%m-%d"));
  if !clean_body.is_empty() {
    release_block.push_str(clean_body);
    release_block.push('\n');
  }
  release_block.push('\n');

  let mut updated = String::with_capacity(text.len() + 64);
  updated.push_str(&text[..heading.start()]);
  updated.push_str(&unreleased_block);
  updated.push('\n');
  updated.push_str(&release_block);
  updated.push_str(&text[body_end..]);

  Ok(updated)
}

/// Whether the unreleased body holds anything besides blanks and sub-headings
fn body_has_entries(body: &str) -> bool {
  body.lines().any(|line| {
    let stripped = line.trim();
    !stripped.is_empty() && !stripped.starts_with("### ")
  })
}

/// Require a dated release section for `version` in the changelog at `path`
pub fn require_release_section(path: &Path, version: &Version) -> ReleaseResult<()> {
  let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

  if !has_release_section(&text, version) {
    return Err(
      ChangelogError::MissingReleaseSection {
        path: path.to_path_buf(),
        version: version.to_string(),
      }
      .into(),
    );
  }

  Ok(())
}

/// Whether changelog text contains `## [version] - ` on a line of its own
pub fn has_release_section(text: &str, version: &Version) -> bool {
  let pattern = format!(r"(?m)^## \[{}\] - ", regex::escape(&version.to_string()));
  Regex::new(&pattern).expect("escaped version regex").is_match(text)
}
