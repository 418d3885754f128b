//! Tap pipeline subcommands
//!
//! Each stage is callable on its own and reads whatever the previous stage
//! persisted, so a failed invocation is always retryable as-is.

use crate::core::env::EnvConfig;
use crate::core::error::{ReleaseResult, TapError};
use crate::core::layout::RepoLayout;
use crate::tap::hints::{self, HintContext, Stage};
use crate::tap::source::{self, DEFAULT_ATTEMPTS, DEFAULT_SLEEP_SECONDS, ResolveRequest, SourceMetadata};
use crate::tap::{DEFAULT_FORMULA_PATH, DEFAULT_SOURCE_REPO, DEFAULT_TAP_REPO, formula, parse_tag, pr, tarball_url, verify};
use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pipeline stage names accepted by `tap next-step`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StageArg {
  AfterSource,
  AfterSync,
  AfterVerify,
  AfterPr,
}

impl From<StageArg> for Stage {
  fn from(value: StageArg) -> Self {
    match value {
      StageArg::AfterSource => Stage::AfterSource,
      StageArg::AfterSync => Stage::AfterSync,
      StageArg::AfterVerify => Stage::AfterVerify,
      StageArg::AfterPr => Stage::AfterPr,
    }
  }
}

/// Homebrew tap publication subcommands
#[derive(Debug, Subcommand)]
pub enum TapCommand {
  /// Show Homebrew tap release status for a tag
  Status {
    /// Release tag (vX.Y.Z)
    #[arg(long)]
    tag: String,

    /// GitHub repo the source tarball comes from
    #[arg(long, default_value = DEFAULT_SOURCE_REPO)]
    source_repo: String,

    /// Source metadata sidecar path (default: .homebrew/source-<tag>.json)
    #[arg(long)]
    source_json: Option<PathBuf>,

    /// GitHub repo hosting the tap
    #[arg(long, default_value = DEFAULT_TAP_REPO)]
    tap_repo: String,

    /// Local checkout of the tap repo
    #[arg(long)]
    tap_repo_dir: Option<PathBuf>,

    /// Formula path inside the tap repo
    #[arg(long, default_value = DEFAULT_FORMULA_PATH)]
    formula_path: PathBuf,
  },

  /// Download and hash the source tarball for a release tag
  ResolveSource {
    /// Release tag (vX.Y.Z)
    #[arg(long)]
    tag: String,

    /// GitHub repo the source tarball comes from
    #[arg(long, default_value = DEFAULT_SOURCE_REPO)]
    source_repo: String,

    /// Download directory (default: .homebrew/)
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Sidecar output path (default: .homebrew/source-<tag>.json)
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Download attempts before giving up
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
    attempts: u32,

    /// Fixed sleep between attempts, in seconds
    #[arg(long, default_value_t = DEFAULT_SLEEP_SECONDS)]
    sleep_seconds: f64,
  },

  /// Create or update the formula from source metadata
  SyncFormula {
    /// Release tag (vX.Y.Z)
    #[arg(long)]
    tag: String,

    /// Formula file to write
    #[arg(long)]
    formula_path: PathBuf,

    /// GitHub repo the source tarball comes from (with --sha256)
    #[arg(long, default_value = DEFAULT_SOURCE_REPO)]
    source_repo: String,

    /// Source metadata sidecar to read URL and hash from
    #[arg(long)]
    source_json: Option<PathBuf>,

    /// Explicit content hash instead of a sidecar
    #[arg(long)]
    sha256: Option<String>,

    /// Report intent without writing
    #[arg(long)]
    dry_run: bool,
  },

  /// Run brew style/audit/install/test for the tap formula
  VerifyFormula {
    /// Release tag (vX.Y.Z)
    #[arg(long)]
    tag: String,

    /// Local checkout of the tap repo
    #[arg(long)]
    tap_repo_dir: PathBuf,

    /// GitHub repo hosting the tap
    #[arg(long, default_value = DEFAULT_TAP_REPO)]
    tap_repo: String,

    /// Formula path inside the tap repo
    #[arg(long, default_value = DEFAULT_FORMULA_PATH)]
    formula_path: PathBuf,
  },

  /// Open or update the pull request in the tap repository
  OpenPr {
    /// Release tag (vX.Y.Z)
    #[arg(long)]
    tag: String,

    /// GitHub repo hosting the tap
    #[arg(long, default_value = DEFAULT_TAP_REPO)]
    tap_repo: String,

    /// Local checkout of the tap repo
    #[arg(long)]
    tap_repo_dir: PathBuf,

    /// Formula path inside the tap repo
    #[arg(long, default_value = DEFAULT_FORMULA_PATH)]
    formula_path: PathBuf,

    /// Base branch of the tap repo
    #[arg(long, default_value = "main")]
    base_branch: String,

    /// Skip pushing and PR creation
    #[arg(long)]
    dry_run: bool,
  },

  /// Print the next recommended command for a pipeline stage
  NextStep {
    /// Stage just completed
    #[arg(long, value_enum)]
    stage: StageArg,

    /// Release tag (vX.Y.Z)
    #[arg(long)]
    tag: Option<String>,

    /// GitHub repo hosting the tap
    #[arg(long, default_value = DEFAULT_TAP_REPO)]
    tap_repo: String,

    /// Local checkout of the tap repo
    #[arg(long)]
    tap_repo_dir: Option<PathBuf>,
  },
}

impl TapCommand {
  /// Execute the tap subcommand
  pub fn execute(self, layout: &RepoLayout, env: &EnvConfig) -> ReleaseResult<()> {
    match self {
      TapCommand::Status {
        tag,
        source_repo,
        source_json,
        tap_repo,
        tap_repo_dir,
        formula_path,
      } => run_status(layout, &tag, &source_repo, source_json, &tap_repo, tap_repo_dir, &formula_path),

      TapCommand::ResolveSource {
        tag,
        source_repo,
        source_dir,
        out_json,
        attempts,
        sleep_seconds,
      } => run_resolve_source(layout, env, &tag, source_repo, source_dir, out_json, attempts, sleep_seconds),

      TapCommand::SyncFormula {
        tag,
        formula_path,
        source_repo,
        source_json,
        sha256,
        dry_run,
      } => run_sync_formula(env, &tag, &formula_path, &source_repo, source_json, sha256, dry_run),

      TapCommand::VerifyFormula {
        tag,
        tap_repo_dir,
        tap_repo,
        formula_path,
      } => run_verify_formula(env, &tag, tap_repo, tap_repo_dir, formula_path),

      TapCommand::OpenPr {
        tag,
        tap_repo,
        tap_repo_dir,
        formula_path,
        base_branch,
        dry_run,
      } => run_open_pr(env, &tag, tap_repo, tap_repo_dir, formula_path, base_branch, dry_run),

      TapCommand::NextStep {
        stage,
        tag,
        tap_repo,
        tap_repo_dir,
      } => {
        hints::emit(
          stage.into(),
          &HintContext {
            tag: tag.as_deref(),
            tap_repo: Some(&tap_repo),
            tap_repo_dir: tap_repo_dir.as_deref(),
            pr_url: None,
          },
          env,
        );
        Ok(())
      }
    }
  }
}

#[allow(clippy::too_many_arguments)]
fn run_status(
  layout: &RepoLayout,
  tag: &str,
  source_repo: &str,
  source_json: Option<PathBuf>,
  tap_repo: &str,
  tap_repo_dir: Option<PathBuf>,
  formula_path: &std::path::Path,
) -> ReleaseResult<()> {
  let version = parse_tag(tag)?;
  let source_json = source_json.unwrap_or_else(|| layout.source_sidecar(tag));
  let requested_url = tarball_url(source_repo, tag);

  println!("tag={}", tag);
  println!("version={}", version);
  println!("requested_url={}", requested_url);
  println!("source_json={}", source_json.display());
  println!("tap_repo={}", tap_repo);
  if let Some(dir) = &tap_repo_dir {
    println!("tap_repo_dir={}", dir.display());
  }
  println!("tap_formula={}", formula_path.display());

  if source_json.exists() {
    let metadata = SourceMetadata::load(&source_json)?;
    println!("resolved_url={}", metadata.resolved_url);
    println!("sha256={}", metadata.sha256);
    println!("download_path={}", metadata.download_path);
  } else {
    println!("source_json_exists=false");
  }

  Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_resolve_source(
  layout: &RepoLayout,
  env: &EnvConfig,
  tag: &str,
  source_repo: String,
  source_dir: Option<PathBuf>,
  out_json: Option<PathBuf>,
  attempts: u32,
  sleep_seconds: f64,
) -> ReleaseResult<()> {
  let tag = tag.trim().to_string();
  let version = parse_tag(&tag)?;

  let request = ResolveRequest {
    version,
    source_repo,
    source_dir: source_dir.unwrap_or_else(|| layout.source_dir()),
    out_json: out_json.unwrap_or_else(|| layout.source_sidecar(&tag)),
    attempts,
    sleep_seconds,
    tag: tag.clone(),
  };

  let metadata = source::resolve(&request)?;

  println!("tag={}", metadata.tag);
  println!("version={}", metadata.version);
  println!("requested_url={}", metadata.requested_url);
  println!("resolved_url={}", metadata.resolved_url);
  println!("sha256={}", metadata.sha256);
  println!("download_path={}", metadata.download_path);
  println!("source_json={}", request.out_json.display());

  hints::emit(
    Stage::AfterSource,
    &HintContext {
      tag: Some(&tag),
      ..Default::default()
    },
    env,
  );

  Ok(())
}

fn run_sync_formula(
  env: &EnvConfig,
  tag: &str,
  formula_path: &std::path::Path,
  source_repo: &str,
  source_json: Option<PathBuf>,
  sha256: Option<String>,
  dry_run: bool,
) -> ReleaseResult<()> {
  let tag = tag.trim();
  parse_tag(tag)?;

  let (source_url, sha256) = if let Some(json_path) = source_json {
    let metadata = SourceMetadata::load(&json_path)?;
    if metadata.tag != tag {
      return Err(
        TapError::SidecarTagMismatch {
          expected: tag.to_string(),
          found: metadata.tag,
        }
        .into(),
      );
    }
    (metadata.requested_url, metadata.sha256)
  } else if let Some(sha) = sha256 {
    (tarball_url(source_repo, tag), sha)
  } else {
    return Err(TapError::MissingHashInput.into());
  };

  let outcome = formula::sync(formula_path, &source_url, &sha256, dry_run)?;

  println!("formula_path={}", formula_path.display());
  println!("changed={}", if outcome.changed { "true" } else { "false" });
  println!("source_url={}", source_url);
  println!("sha256={}", sha256);

  hints::emit(
    Stage::AfterSync,
    &HintContext {
      tag: Some(tag),
      ..Default::default()
    },
    env,
  );

  Ok(())
}

fn run_verify_formula(
  env: &EnvConfig,
  tag: &str,
  tap_repo: String,
  tap_repo_dir: PathBuf,
  formula_path: PathBuf,
) -> ReleaseResult<()> {
  parse_tag(tag)?;

  let request = verify::VerifyRequest {
    tap_repo,
    tap_repo_dir,
    formula_path,
  };
  let verified = verify::verify(&request)?;

  println!("verified_formula={}", verified.display());

  hints::emit(
    Stage::AfterVerify,
    &HintContext {
      tag: Some(tag),
      tap_repo_dir: Some(&request.tap_repo_dir),
      ..Default::default()
    },
    env,
  );

  Ok(())
}

fn run_open_pr(
  env: &EnvConfig,
  tag: &str,
  tap_repo: String,
  tap_repo_dir: PathBuf,
  formula_path: PathBuf,
  base_branch: String,
  dry_run: bool,
) -> ReleaseResult<()> {
  let tag = tag.trim().to_string();
  let version = parse_tag(&tag)?;

  let request = pr::PrRequest {
    version,
    tap_repo,
    tap_repo_dir,
    formula_path,
    base_branch,
    dry_run,
    tag: tag.clone(),
  };
  let outcome = pr::open_or_update(&request)?;

  println!("tap_repo={}", request.tap_repo);
  println!("tap_branch={}", outcome.branch);
  println!("has_changes={}", if outcome.has_changes { "true" } else { "false" });
  if let Some(url) = &outcome.pr_url {
    println!("pr_url={}", url);
  }

  hints::emit(
    Stage::AfterPr,
    &HintContext {
      tag: Some(&tag),
      tap_repo: Some(&request.tap_repo),
      tap_repo_dir: Some(&request.tap_repo_dir),
      pr_url: outcome.pr_url.as_deref(),
    },
    env,
  );

  Ok(())
}
