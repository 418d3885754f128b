//! Tap pull request open/update
//!
//! Branch, commit and PR are all keyed on a deterministic, version-derived
//! branch name, so the stage is safe to re-run after any partial failure:
//! an unchanged formula produces no new commit, an existing PR is edited
//! rather than duplicated.

use crate::core::error::{CommandError, ReleaseResult, TapError};
use crate::core::process;
use crate::core::vcs::SystemGit;
use crate::tap::{DEFAULT_SOURCE_REPO, tarball_url};
use semver::Version;
use serde::Deserialize;
use std::path::PathBuf;

/// Inputs for one PR pass
pub struct PrRequest {
  pub tag: String,
  pub version: Version,
  pub tap_repo: String,
  pub tap_repo_dir: PathBuf,
  pub formula_path: PathBuf,
  pub base_branch: String,
  pub dry_run: bool,
}

/// What the PR pass did
pub struct PrOutcome {
  pub branch: String,
  pub has_changes: bool,
  pub pr_url: Option<String>,
}

#[derive(Deserialize)]
struct PrListEntry {
  #[allow(dead_code)]
  number: u64,
  url: String,
}

/// Deterministic head branch for a formula version
pub fn branch_name(version: &Version) -> String {
  format!("envgen-{}", version)
}

/// Open a new tap PR or update the existing one for this version's branch
pub fn open_or_update(request: &PrRequest) -> ReleaseResult<PrOutcome> {
  if !request.tap_repo_dir.exists() {
    return Err(
      TapError::TapRepoDirMissing {
        path: request.tap_repo_dir.clone(),
      }
      .into(),
    );
  }
  let full_formula_path = request.tap_repo_dir.join(&request.formula_path);
  if !full_formula_path.exists() {
    return Err(TapError::FormulaMissing { path: full_formula_path }.into());
  }
  if !request.dry_run && !process::available("gh") {
    return Err(
      CommandError::NotFound {
        program: "gh".to_string(),
      }
      .into(),
    );
  }

  let branch = branch_name(&request.version);
  let title = format!("envgen {}", request.version);
  let body = format!(
    "Update envgen formula to {tag}.\n\n- Source tag: `{tag}`\n- Source tarball: `{url}`",
    tag = request.tag,
    url = tarball_url(DEFAULT_SOURCE_REPO, &request.tag),
  );

  let git = SystemGit::open(&request.tap_repo_dir)?;
  git.run(&["fetch", "origin", &request.base_branch])?;

  let start_ref = if git.remote_branch_exists(&branch)? {
    format!("origin/{}", branch)
  } else {
    format!("origin/{}", request.base_branch)
  };
  git.run(&["checkout", "-B", &branch, &start_ref])?;

  let formula_rel = request.formula_path.display().to_string();
  git.run(&["add", &formula_rel])?;

  let has_changes = git.has_staged_changes()?;
  if has_changes {
    git.run(&["commit", "-m", &title])?;
    if request.dry_run {
      println!("[dry-run] git push --force-with-lease origin {}", branch);
    } else {
      git.run(&["push", "--force-with-lease", "origin", &branch])?;
    }
  }

  let pr_url = if request.dry_run {
    println!("[dry-run] skip gh pr create/edit");
    None
  } else {
    sync_pull_request(request, &branch, &title, &body)?
  };

  Ok(PrOutcome {
    branch,
    has_changes,
    pr_url,
  })
}

/// Edit the open PR for `branch` if one exists, else create it
fn sync_pull_request(request: &PrRequest, branch: &str, title: &str, body: &str) -> ReleaseResult<Option<String>> {
  if let Some(url) = existing_pr_url(&request.tap_repo, branch)? {
    process::run(
      "gh",
      &[
        "pr",
        "edit",
        &url,
        "--repo",
        &request.tap_repo,
        "--title",
        title,
        "--body",
        body,
      ],
      None,
    )?;
    return Ok(Some(url));
  }

  let stdout = process::run_capture(
    "gh",
    &[
      "pr",
      "create",
      "--repo",
      &request.tap_repo,
      "--base",
      &request.base_branch,
      "--head",
      branch,
      "--title",
      title,
      "--body",
      body,
    ],
    None,
  )?;

  // gh prints the PR URL as the last stdout line; fall back to a fresh
  // query if the output shape ever changes
  let created = stdout.trim().lines().last().map(str::trim).unwrap_or("").to_string();
  if !created.is_empty() {
    return Ok(Some(created));
  }
  existing_pr_url(&request.tap_repo, branch)
}

/// URL of the open PR whose head is `branch`, if any
fn existing_pr_url(tap_repo: &str, branch: &str) -> ReleaseResult<Option<String>> {
  let stdout = process::run_capture(
    "gh",
    &[
      "pr", "list", "--repo", tap_repo, "--head", branch, "--json", "number,url", "--limit", "1",
    ],
    None,
  )?;

  let entries: Vec<PrListEntry> = serde_json::from_str(stdout.trim())?;
  Ok(entries.into_iter().next().map(|e| e.url))
}
