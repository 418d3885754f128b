//! Atomic file write helpers
//!
//! Every file this tool rewrites goes through a temp-file-then-rename step so
//! a crash mid-write never leaves a half-written target behind.

use crate::core::error::{ReleaseResult, ResultExt};
use std::fs;
use std::path::Path;

/// Write `content` to `path` via a sibling temp file and rename
pub fn write_atomic(path: &Path, content: &str) -> ReleaseResult<()> {
  let tmp_path = tmp_sibling(path);

  fs::write(&tmp_path, content).with_context(|| format!("Failed to write {}", tmp_path.display()))?;
  fs::rename(&tmp_path, path).with_context(|| format!("Failed to rename {} into place", tmp_path.display()))?;

  Ok(())
}

/// Same as [`write_atomic`] but creates missing parent directories first
pub fn write_atomic_with_parents(path: &Path, content: &str) -> ReleaseResult<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  write_atomic(path, content)
}

fn tmp_sibling(path: &Path) -> std::path::PathBuf {
  let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".tmp");
  path.with_file_name(name)
}
