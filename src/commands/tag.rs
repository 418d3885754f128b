//! Tag commands: create a local annotated tag, push it to origin

use crate::core::env::EnvConfig;
use crate::core::error::ReleaseResult;
use crate::core::layout::RepoLayout;
use crate::core::vcs::SystemGit;
use crate::release::{Track, tags};

/// Run `tag <track>`
pub fn run_tag(layout: &RepoLayout, env: &EnvConfig, track: Track, dry_run: bool) -> ReleaseResult<()> {
  let git = SystemGit::open(&layout.root)?;
  let tag = tags::create_tag(&git, track, layout, env, dry_run)?;
  println!("created local tag: {}", tag);
  Ok(())
}

/// Run `push-tag <track>`
pub fn run_push_tag(layout: &RepoLayout, env: &EnvConfig, track: Track, dry_run: bool) -> ReleaseResult<()> {
  let git = SystemGit::open(&layout.root)?;
  let tag = tags::push_tag(&git, track, layout, env, dry_run)?;
  println!("pushed tag: {}", tag);
  Ok(())
}
