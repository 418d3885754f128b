//! Tag guard tests: create/push lifecycle against real git repositories

use crate::helpers::{
  ReleaseRepo, git, run_release, run_release_expect_failure, run_release_expect_failure_with_env,
  run_release_with_env,
};

fn local_tags(repo: &ReleaseRepo) -> Vec<String> {
  let output = git(&repo.path, &["tag", "--list"]).unwrap();
  String::from_utf8_lossy(&output.stdout)
    .lines()
    .map(String::from)
    .collect()
}

#[test]
fn tag_crate_creates_annotated_tag_once() {
  let repo = ReleaseRepo::new().unwrap();

  let stdout = run_release(&repo.path, &["tag", "crate"]).unwrap();
  assert!(stdout.contains("created local tag: v1.2.0"));
  assert_eq!(local_tags(&repo), vec!["v1.2.0".to_string()]);

  // Annotated, not lightweight
  let output = git(&repo.path, &["cat-file", "-t", "v1.2.0"]).unwrap();
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "tag");

  let stderr = run_release_expect_failure(&repo.path, &["tag", "crate"]).unwrap();
  assert!(stderr.contains("Local tag already exists: v1.2.0"));
}

#[test]
fn tag_schema_uses_schema_prefix() {
  let repo = ReleaseRepo::new().unwrap();

  let stdout = run_release(&repo.path, &["tag", "schema"]).unwrap();
  assert!(stdout.contains("created local tag: schema-v1.0.0"));
  assert_eq!(local_tags(&repo), vec!["schema-v1.0.0".to_string()]);
}

#[test]
fn tag_requires_finalized_changelog_section() {
  let repo = ReleaseRepo::new().unwrap();
  repo
    .write_file("CHANGELOG.md", "# Changelog\n\n## [Unreleased]\n\n- Pending\n")
    .unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["tag", "crate"]).unwrap();
  assert!(stderr.contains("Missing release section '## [1.2.0] - YYYY-MM-DD'"));
  assert!(local_tags(&repo).is_empty());
}

#[test]
fn tag_dry_run_creates_nothing() {
  let repo = ReleaseRepo::new().unwrap();

  let stdout = run_release(&repo.path, &["tag", "crate", "--dry-run"]).unwrap();
  assert!(stdout.contains("[dry-run] git tag -a v1.2.0"));
  assert!(local_tags(&repo).is_empty());
}

#[test]
fn tag_honors_matching_version_override_and_rejects_mismatch() {
  let repo = ReleaseRepo::new().unwrap();

  let stderr =
    run_release_expect_failure_with_env(&repo.path, &["tag", "crate"], &[("VERSION", "9.9.9")]).unwrap();
  assert!(stderr.contains("VERSION override does not match"));
  assert!(local_tags(&repo).is_empty());

  let stdout = run_release_with_env(&repo.path, &["tag", "crate"], &[("VERSION", "1.2.0")]).unwrap();
  assert!(stdout.contains("created local tag: v1.2.0"));
}

#[test]
fn push_tag_requires_local_tag_first() {
  let repo = ReleaseRepo::new().unwrap();
  repo.add_bare_origin().unwrap();

  let stderr = run_release_expect_failure(&repo.path, &["push-tag", "crate"]).unwrap();
  assert!(stderr.contains("Local tag does not exist: v1.2.0"));
}

#[test]
fn push_tag_pushes_once_then_refuses_remote_duplicate() {
  let repo = ReleaseRepo::new().unwrap();
  let origin = repo.add_bare_origin().unwrap();

  run_release(&repo.path, &["tag", "crate"]).unwrap();
  let stdout = run_release(&repo.path, &["push-tag", "crate"]).unwrap();
  assert!(stdout.contains("pushed tag: v1.2.0"));

  // The tag is visible in the bare origin
  let output = std::process::Command::new("git")
    .arg("-C")
    .arg(&origin)
    .args(["tag", "--list"])
    .output()
    .unwrap();
  assert!(String::from_utf8_lossy(&output.stdout).contains("v1.2.0"));

  let stderr = run_release_expect_failure(&repo.path, &["push-tag", "crate"]).unwrap();
  assert!(stderr.contains("Remote tag already exists on origin: v1.2.0"));
}

#[test]
fn push_tag_dry_run_does_not_push() {
  let repo = ReleaseRepo::new().unwrap();
  let origin = repo.add_bare_origin().unwrap();

  run_release(&repo.path, &["tag", "crate"]).unwrap();
  let stdout = run_release(&repo.path, &["push-tag", "crate", "--dry-run"]).unwrap();
  assert!(stdout.contains("[dry-run] git push origin refs/tags/v1.2.0"));

  let output = std::process::Command::new("git")
    .arg("-C")
    .arg(&origin)
    .args(["tag", "--list"])
    .output()
    .unwrap();
  assert!(String::from_utf8_lossy(&output.stdout).trim().is_empty());
}

#[test]
fn bump_then_tag_flow_agrees_on_version() {
  let repo = ReleaseRepo::new().unwrap();

  run_release(&repo.path, &["bump", "crate", "--level", "minor"]).unwrap();
  let stdout = run_release(&repo.path, &["tag", "crate"]).unwrap();
  assert!(stdout.contains("created local tag: v1.3.0"));
}
