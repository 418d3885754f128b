//! Status command tests

use crate::helpers::{ReleaseRepo, run_release, run_release_expect_failure};

#[test]
fn status_reports_both_tracks() {
  let repo = ReleaseRepo::new().unwrap();

  let stdout = run_release(&repo.path, &["status"]).unwrap();

  assert!(stdout.contains("crate_version=1.2.0"));
  assert!(stdout.contains("schema_version=1.0.0"));
  assert!(stdout.contains("envgen.schema.v1.0.0.json"));
  assert!(stdout.contains("schema_file_exists=yes"));
}

#[test]
fn status_flags_missing_schema_artifact() {
  let repo = ReleaseRepo::new().unwrap();
  std::fs::remove_file(repo.path.join("schemas/envgen.schema.v1.0.0.json")).unwrap();

  let stdout = run_release(&repo.path, &["status"]).unwrap();
  assert!(stdout.contains("schema_file_exists=no"));
}

#[test]
fn status_fails_without_schema_version_file() {
  let repo = ReleaseRepo::new().unwrap();
  std::fs::remove_file(repo.path.join("SCHEMA_VERSION")).unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["status"]).unwrap();
  assert!(stderr.contains("Missing schema version file"));
}
