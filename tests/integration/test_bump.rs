//! Bump command tests: version resolution, manifest edit, changelog rotation,
//! schema artifact rename

use crate::helpers::{MANIFEST, ReleaseRepo, run_release, run_release_expect_failure};

#[test]
fn bump_crate_minor_updates_manifest_and_changelog() {
  let repo = ReleaseRepo::new().unwrap();

  let stdout = run_release(&repo.path, &["bump", "crate", "--level", "minor"]).unwrap();
  assert!(stdout.contains("crate version: 1.2.0 -> 1.3.0"));

  let manifest = repo.read_file("Cargo.toml").unwrap();
  assert!(manifest.contains("version = \"1.3.0\""));
  // Everything else in the manifest is byte-identical
  assert_eq!(manifest, MANIFEST.replace("\"1.2.0\"", "\"1.3.0\""));

  let changelog = repo.read_file("CHANGELOG.md").unwrap();
  assert!(changelog.contains("## [1.3.0] - "));
  // Entries moved, not copied
  assert_eq!(changelog.matches("Pull command retries").count(), 1);
  // Old release still present exactly once
  assert_eq!(changelog.matches("## [1.2.0] - 2026-07-01").count(), 1);
  // Fresh unreleased section sits first with the same headings and no entries
  let unreleased_start = changelog.find("## [Unreleased]").unwrap();
  let next_release = changelog.find("## [1.3.0]").unwrap();
  assert!(unreleased_start < next_release);
  let fresh = &changelog[unreleased_start..next_release];
  assert!(fresh.contains("### Added"));
  assert!(fresh.contains("### Fixed"));
  assert!(!fresh.contains("- "));
}

#[test]
fn bump_crate_explicit_version() {
  let repo = ReleaseRepo::new().unwrap();

  run_release(&repo.path, &["bump", "crate", "--version", "2.0.0"]).unwrap();
  assert!(repo.read_file("Cargo.toml").unwrap().contains("version = \"2.0.0\""));
}

#[test]
fn bump_crate_requires_exactly_one_selector() {
  let repo = ReleaseRepo::new().unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["bump", "crate"]).unwrap();
  assert!(stderr.contains("exactly one of --level or --version"));

  let stderr = run_release_expect_failure(
    &repo.path,
    &["bump", "crate", "--level", "patch", "--version", "2.0.0"],
  )
  .unwrap();
  assert!(stderr.contains("exactly one of --level or --version"));
}

#[test]
fn bump_crate_rejects_same_version_and_bad_versions() {
  let repo = ReleaseRepo::new().unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["bump", "crate", "--version", "1.2.0"]).unwrap();
  assert!(stderr.contains("nothing to do"));

  let stderr = run_release_expect_failure(&repo.path, &["bump", "crate", "--version", "1.3"]).unwrap();
  assert!(stderr.contains("Expected strict semver"));

  let stderr = run_release_expect_failure(&repo.path, &["bump", "crate", "--version", "1.3.0-rc.1"]).unwrap();
  assert!(stderr.contains("Expected strict semver"));
}

#[test]
fn bump_crate_empty_changelog_needs_explicit_allow() {
  let repo = ReleaseRepo::new().unwrap();
  repo
    .write_file(
      "CHANGELOG.md",
      "# Changelog\n\n## [Unreleased]\n\n### Added\n\n## [1.2.0] - 2026-07-01\n\n- Old entry\n",
    )
    .unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["bump", "crate", "--level", "patch"]).unwrap();
  assert!(stderr.contains("has no entries"));
  assert!(stderr.contains("--allow-empty-changelog"));

  // The bump is not transactional: the manifest was already rewritten when
  // the rotation refused. Restore it before retrying.
  assert!(repo.read_file("Cargo.toml").unwrap().contains("version = \"1.2.1\""));
  repo.write_file("Cargo.toml", MANIFEST).unwrap();

  run_release(
    &repo.path,
    &["bump", "crate", "--level", "patch", "--allow-empty-changelog"],
  )
  .unwrap();
  let changelog = repo.read_file("CHANGELOG.md").unwrap();
  assert!(changelog.contains("## [1.2.1] - "));
}

#[test]
fn bump_crate_dry_run_leaves_files_untouched() {
  let repo = ReleaseRepo::new().unwrap();
  let manifest_before = repo.read_file("Cargo.toml").unwrap();
  let changelog_before = repo.read_file("CHANGELOG.md").unwrap();

  let stdout = run_release(&repo.path, &["bump", "crate", "--level", "major", "--dry-run"]).unwrap();
  assert!(stdout.contains("[dry-run]"));
  assert!(stdout.contains("crate version: 1.2.0 -> 2.0.0"));

  assert_eq!(repo.read_file("Cargo.toml").unwrap(), manifest_before);
  assert_eq!(repo.read_file("CHANGELOG.md").unwrap(), changelog_before);
}

#[test]
fn bump_schema_renames_artifact_and_updates_marker() {
  let repo = ReleaseRepo::new().unwrap();

  let stdout = run_release(&repo.path, &["bump", "schema", "--level", "minor"]).unwrap();
  assert!(stdout.contains("schema version: 1.0.0 -> 1.1.0"));

  assert_eq!(repo.read_file("SCHEMA_VERSION").unwrap(), "1.1.0\n");
  assert!(!repo.file_exists("schemas/envgen.schema.v1.0.0.json"));

  let artifact = repo.read_file("schemas/envgen.schema.v1.1.0.json").unwrap();
  assert!(artifact.contains("\"x-envgen-schema-version\": \"1.1.0\""));

  let changelog = repo.read_file("SCHEMA_CHANGELOG.md").unwrap();
  assert!(changelog.contains("## [1.1.0] - "));
  assert_eq!(changelog.matches("Provider metadata block").count(), 1);
}

#[test]
fn bump_schema_refuses_preexisting_target_artifact() {
  let repo = ReleaseRepo::new().unwrap();
  repo
    .write_file("schemas/envgen.schema.v1.1.0.json", "{}\n")
    .unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["bump", "schema", "--level", "minor"]).unwrap();
  assert!(stderr.contains("Target schema file already exists"));

  // Nothing moved
  assert!(repo.file_exists("schemas/envgen.schema.v1.0.0.json"));
  assert_eq!(repo.read_file("SCHEMA_VERSION").unwrap(), "1.0.0\n");
}

#[test]
fn bump_schema_requires_current_artifact() {
  let repo = ReleaseRepo::new().unwrap();
  std::fs::remove_file(repo.path.join("schemas/envgen.schema.v1.0.0.json")).unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["bump", "schema", "--level", "patch"]).unwrap();
  assert!(stderr.contains("Current schema file does not exist"));
}
