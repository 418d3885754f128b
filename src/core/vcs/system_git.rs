//! System git backend
//!
//! Uses the system git binary for all operations with an isolated
//! environment: no inherited GIT_* variables, only PATH and HOME pass
//! through, and a few safe config overrides are forced.

use crate::core::error::{CommandError, ReleaseError, ReleaseResult, TagError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git access rooted at one repository
pub struct SystemGit {
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository, verifying the path is inside a work tree
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let git = Self {
      repo_path: path.to_path_buf(),
    };

    let output = git.output(&["rev-parse", "--git-dir"])?;
    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ReleaseError::message(format!(
        "Not a git repository: {} ({})",
        path.display(),
        stderr.trim()
      )));
    }

    Ok(git)
  }

  pub fn root(&self) -> &Path {
    &self.repo_path
  }

  /// Whether an exact tag ref exists locally
  pub fn tag_exists_local(&self, tag: &str) -> ReleaseResult<bool> {
    let refname = format!("refs/tags/{}", tag);
    let output = self.output(&["show-ref", "--verify", "--quiet", &refname])?;
    Ok(output.status.success())
  }

  /// Whether an exact tag ref exists on origin
  ///
  /// A failing ls-remote (network, auth, missing remote) is an error, not a
  /// "no": the caller must not conclude the tag is pushable.
  pub fn tag_exists_remote(&self, tag: &str) -> ReleaseResult<bool> {
    let refname = format!("refs/tags/{}", tag);
    let output = self.output(&["ls-remote", "--tags", "origin", &refname])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(
        TagError::RemoteQueryFailed {
          tag: tag.to_string(),
          detail: if stderr.is_empty() {
            "unknown git error".to_string()
          } else {
            stderr
          },
        }
        .into(),
      );
    }

    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
  }

  /// Whether a branch ref exists on origin
  pub fn remote_branch_exists(&self, branch: &str) -> ReleaseResult<bool> {
    let stdout = self.run_capture(&["ls-remote", "--heads", "origin", branch])?;
    Ok(!stdout.trim().is_empty())
  }

  /// Whether the index holds staged changes
  pub fn has_staged_changes(&self) -> ReleaseResult<bool> {
    let output = self.output(&["diff", "--cached", "--quiet"])?;
    Ok(!output.status.success())
  }

  /// Run a git command, failing on non-zero exit with stderr surfaced
  pub fn run(&self, args: &[&str]) -> ReleaseResult<()> {
    let output = self.output(args)?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
      return Err(
        CommandError::Failed {
          command: format!("git {}", args.join(" ")),
          detail: if !stderr.is_empty() { stderr } else { stdout },
        }
        .into(),
      );
    }

    Ok(())
  }

  /// Run a git command and return trimmed stdout, failing on non-zero exit
  pub fn run_capture(&self, args: &[&str]) -> ReleaseResult<String> {
    let output = self.output(args)?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(
        CommandError::Failed {
          command: format!("git {}", args.join(" ")),
          detail: stderr,
        }
        .into(),
      );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  fn output(&self, args: &[&str]) -> ReleaseResult<Output> {
    self.git_cmd().args(args).output().map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        CommandError::NotFound {
          program: "git".to_string(),
        }
        .into()
      } else {
        ReleaseError::message(format!("Failed to execute git: {}", e))
      }
    })
  }

  /// Create a git command with isolated environment
  ///
  /// - Sets working directory to the repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Forces safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");

    cmd
  }
}
