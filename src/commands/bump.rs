//! Version bump: resolve the next version, mutate the track artifact,
//! rotate the changelog
//!
//! The artifact is validated (and for the crate, rewritten) before the
//! changelog rotates. A rotation failure can leave the manifest already
//! bumped; the working tree is under git, and tagging refuses any version
//! without a finalized changelog section, so a half-applied bump cannot
//! escape.

use crate::core::error::ReleaseResult;
use crate::core::layout::RepoLayout;
use crate::release::{Track, changelog, manifest, schema, version};
use crate::release::version::BumpLevel;

/// Run `bump <track>`
pub fn run_bump(
  layout: &RepoLayout,
  track: Track,
  level: Option<BumpLevel>,
  explicit_version: Option<&str>,
  allow_empty_changelog: bool,
  dry_run: bool,
) -> ReleaseResult<()> {
  match track {
    Track::Crate => bump_crate(layout, level, explicit_version, allow_empty_changelog, dry_run),
    Track::Schema => bump_schema(layout, level, explicit_version, allow_empty_changelog, dry_run),
  }
}

fn bump_crate(
  layout: &RepoLayout,
  level: Option<BumpLevel>,
  explicit_version: Option<&str>,
  allow_empty: bool,
  dry_run: bool,
) -> ReleaseResult<()> {
  let manifest_path = layout.manifest();
  let current = manifest::read_version(&manifest_path)?;
  let next = version::resolve_next(&current, level, explicit_version)?;

  let (old, new) = manifest::update_version(&manifest_path, &next, dry_run)?;
  changelog::rotate(
    &layout.changelog(),
    &new,
    Track::Crate.default_sections(),
    allow_empty,
    dry_run,
  )?;

  println!("crate version: {} -> {}", old, new);
  println!("updated: {}", manifest_path.display());
  println!("updated: {}", layout.changelog().display());

  Ok(())
}

fn bump_schema(
  layout: &RepoLayout,
  level: Option<BumpLevel>,
  explicit_version: Option<&str>,
  allow_empty: bool,
  dry_run: bool,
) -> ReleaseResult<()> {
  let current = schema::read_current_version(layout)?;
  let next = version::resolve_next(&current, level, explicit_version)?;

  // Validate everything about the artifact move before any file changes
  let prepared = schema::prepare_bump(layout, &next)?;

  changelog::rotate(
    &layout.schema_changelog(),
    &next,
    Track::Schema.default_sections(),
    allow_empty,
    dry_run,
  )?;

  prepared.apply(dry_run)?;

  println!("schema version: {} -> {}", prepared.old_version, prepared.new_version);
  println!("updated: {}", layout.schema_version_file().display());
  println!("updated: {}", layout.schema_changelog().display());
  println!(
    "renamed: {} -> {}",
    prepared.old_path.display(),
    prepared.new_path.display()
  );

  Ok(())
}
