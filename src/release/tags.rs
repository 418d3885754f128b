//! Tag lifecycle guards
//!
//! A release tag moves `absent -> local -> remote` and is never rewritten.
//! Creation requires the changelog to already carry a dated release section
//! for the exact version, so an unfinished bump cannot be tagged. Pushing
//! requires the tag to exist locally and not yet on origin.

use crate::core::env::EnvConfig;
use crate::core::error::{ReleaseResult, TagError};
use crate::core::layout::RepoLayout;
use crate::core::process::display_command;
use crate::core::vcs::SystemGit;
use crate::release::{Track, changelog, manifest, schema, version};
use semver::Version;

/// Resolve the version to tag for a track
///
/// The on-disk artifact is authoritative; an environment override must match
/// it exactly. With `require_release_section`, the track changelog must
/// already hold a dated section for the version.
pub fn resolve_tag_version(
  track: Track,
  layout: &RepoLayout,
  env: &EnvConfig,
  require_release_section: bool,
) -> ReleaseResult<Version> {
  let resolved = match track {
    Track::Crate => {
      let on_disk = manifest::read_version(&layout.manifest())?;
      version::resolve_with_override(&on_disk, env.crate_version_override.as_deref(), "VERSION")?
    }
    Track::Schema => {
      let on_disk = schema::read_current_version(layout)?;
      version::resolve_with_override(&on_disk, env.schema_version_override.as_deref(), "SCHEMA_VERSION")?
    }
  };

  if require_release_section {
    changelog::require_release_section(&track.changelog_path(layout), &resolved)?;
  }

  Ok(resolved)
}

/// Create the local annotated tag for a track, returning the tag name
pub fn create_tag(
  git: &SystemGit,
  track: Track,
  layout: &RepoLayout,
  env: &EnvConfig,
  dry_run: bool,
) -> ReleaseResult<String> {
  let version = resolve_tag_version(track, layout, env, true)?;
  let tag = track.tag_name(&version);

  if git.tag_exists_local(&tag)? {
    return Err(TagError::AlreadyExists { tag }.into());
  }

  let message = track.tag_message(&tag);
  let args = ["tag", "-a", tag.as_str(), "-m", message.as_str()];
  if dry_run {
    println!("[dry-run] {}", display_command("git", &args));
  } else {
    git.run(&args)?;
  }

  Ok(tag)
}

/// Push an existing local tag to origin, returning the tag name
pub fn push_tag(
  git: &SystemGit,
  track: Track,
  layout: &RepoLayout,
  env: &EnvConfig,
  dry_run: bool,
) -> ReleaseResult<String> {
  let version = resolve_tag_version(track, layout, env, false)?;
  let tag = track.tag_name(&version);

  if !git.tag_exists_local(&tag)? {
    return Err(TagError::NotCreated { tag }.into());
  }
  if git.tag_exists_remote(&tag)? {
    return Err(TagError::AlreadyOnRemote { tag }.into());
  }

  let refspec = format!("refs/tags/{}", tag);
  let args = ["push", "origin", refspec.as_str()];
  if dry_run {
    println!("[dry-run] {}", display_command("git", &args));
  } else {
    git.run(&args)?;
  }

  Ok(tag)
}
