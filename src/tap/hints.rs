//! Advisory next-step hints
//!
//! After a mutating tap stage, print the next recommended command. Purely
//! informational: hint rendering never touches control flow or exit status,
//! and display is gated by the resolved environment config (explicit
//! override, then CI, then terminal detection).

use crate::core::env::EnvConfig;
use std::path::Path;

/// Pipeline positions a hint can follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  AfterSource,
  AfterSync,
  AfterVerify,
  AfterPr,
}

/// Values interpolated into hint text, all optional
#[derive(Debug, Default)]
pub struct HintContext<'a> {
  pub tag: Option<&'a str>,
  pub tap_repo: Option<&'a str>,
  pub tap_repo_dir: Option<&'a Path>,
  pub pr_url: Option<&'a str>,
}

/// Render a hint as (summary, command lines)
pub fn render(stage: Stage, ctx: &HintContext<'_>) -> (String, Vec<String>) {
  let tag = ctx.tag.unwrap_or("vX.Y.Z");
  let dir = ctx
    .tap_repo_dir
    .map(|d| d.display().to_string())
    .unwrap_or_else(|| "<tap-repo-dir>".to_string());
  let repo = ctx.tap_repo.unwrap_or(super::DEFAULT_TAP_REPO);

  match stage {
    Stage::AfterSource => (
      format!("Homebrew source metadata resolved for {}.", tag),
      vec![format!(
        "$ envgen-release tap sync-formula --tag {} --formula-path {}/Formula/envgen.rb",
        tag, dir
      )],
    ),
    Stage::AfterSync => (
      "Tap formula synchronized from source metadata.".to_string(),
      vec![format!(
        "$ envgen-release tap verify-formula --tag {} --tap-repo-dir {}",
        tag, dir
      )],
    ),
    Stage::AfterVerify => (
      "Tap formula verification passed.".to_string(),
      vec![format!(
        "$ envgen-release tap open-pr --tag {} --tap-repo-dir {} --tap-repo {}",
        tag, dir, repo
      )],
    ),
    Stage::AfterPr => {
      let mut lines = Vec::new();
      if let Some(url) = ctx.pr_url {
        lines.push(format!("Tap PR: {}", url));
      }
      lines.push("Review and merge the tap PR after checks pass.".to_string());
      lines.push("Install path for users: brew tap smorinlabs/tap && brew install envgen".to_string());
      ("Tap pull request is ready.".to_string(), lines)
    }
  }
}

/// Print a hint if hint display is enabled
pub fn emit(stage: Stage, ctx: &HintContext<'_>, env: &EnvConfig) {
  if !env.hints_enabled() {
    return;
  }

  let (summary, lines) = render(stage, ctx);
  println!();
  println!("Hint: {}", summary);
  println!("Next:");
  for line in lines {
    println!("  {}", line);
  }
}
