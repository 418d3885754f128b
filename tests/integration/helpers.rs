//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const MANIFEST: &str = r#"[package]
name = "envgen"
version = "1.2.0"
edition = "2021"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
"#;

pub const CHANGELOG: &str = r#"# Changelog

## [Unreleased]

### Added

- Pull command retries on transient source errors

### Fixed

- Empty YAML files no longer panic the parser

## [1.2.0] - 2026-07-01

### Added

- Initial release automation
"#;

pub const SCHEMA_CHANGELOG: &str = r#"# Schema Changelog

## [Unreleased]

### Added

- Provider metadata block

## [1.0.0] - 2026-06-01

### Added

- Initial schema
"#;

pub const SCHEMA_JSON: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "x-envgen-schema-version": "1.0.0",
  "type": "object",
  "properties": {}
}
"#;

/// A release-managed repository with git history
pub struct ReleaseRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl ReleaseRepo {
  /// Create a repository with both tracks at known versions
  /// (crate 1.2.0, schema 1.0.0)
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("repo");
    std::fs::create_dir_all(&path)?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("Cargo.toml"), MANIFEST)?;
    std::fs::write(path.join("CHANGELOG.md"), CHANGELOG)?;
    std::fs::write(path.join("SCHEMA_VERSION"), "1.0.0\n")?;
    std::fs::write(path.join("SCHEMA_CHANGELOG.md"), SCHEMA_CHANGELOG)?;
    std::fs::create_dir_all(path.join("schemas"))?;
    std::fs::write(path.join("schemas/envgen.schema.v1.0.0.json"), SCHEMA_JSON)?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial release fixture"])?;

    Ok(Self { _root: root, path })
  }

  /// Attach a local bare repository as `origin` and push main
  pub fn add_bare_origin(&self) -> Result<PathBuf> {
    let origin = self.path.parent().unwrap().join("origin.git");
    let status = Command::new("git")
      .args(["init", "--bare", "--initial-branch=main"])
      .arg(&origin)
      .status()?;
    anyhow::ensure!(status.success(), "git init --bare failed");

    git(&self.path, &["remote", "add", "origin", origin.to_str().unwrap()])?;
    git(&self.path, &["push", "origin", "main"])?;
    Ok(origin)
  }

  pub fn read_file(&self, rel: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(rel))?)
  }

  pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
    std::fs::write(self.path.join(rel), content)?;
    Ok(())
  }

  pub fn file_exists(&self, rel: &str) -> bool {
    self.path.join(rel).exists()
  }
}

/// Run git in a directory, failing the test on non-zero exit
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

fn release_command(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_envgen-release");

  let mut cmd = Command::new(bin);
  cmd.current_dir(cwd).args(args);
  // Keep ambient release overrides out of the tests
  cmd.env_remove("VERSION");
  cmd.env_remove("SCHEMA_VERSION");
  cmd.env_remove("ENVGEN_HINTS");
  cmd.env_remove("CI");
  for (key, value) in envs {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run envgen-release")
}

/// Run the binary, expecting success; returns stdout
pub fn run_release(cwd: &Path, args: &[&str]) -> Result<String> {
  run_release_with_env(cwd, args, &[])
}

/// Run the binary with extra environment variables, expecting success
pub fn run_release_with_env(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<String> {
  let output = release_command(cwd, args, envs)?;

  if !output.status.success() {
    anyhow::bail!(
      "envgen-release {} failed\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr),
    );
  }

  Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run the binary, expecting failure with exit code 1; returns stderr
pub fn run_release_expect_failure(cwd: &Path, args: &[&str]) -> Result<String> {
  run_release_expect_failure_with_env(cwd, args, &[])
}

/// Run the binary with extra env, expecting failure; returns stderr
pub fn run_release_expect_failure_with_env(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<String> {
  let output = release_command(cwd, args, envs)?;

  anyhow::ensure!(
    !output.status.success(),
    "envgen-release {} unexpectedly succeeded",
    args.join(" ")
  );
  anyhow::ensure!(
    output.status.code() == Some(1),
    "expected exit code 1, got {:?}",
    output.status.code()
  );

  Ok(String::from_utf8_lossy(&output.stderr).into_owned())
}
