//! Release status: current versions of both tracks

use crate::core::error::ReleaseResult;
use crate::core::layout::RepoLayout;
use crate::release::{manifest, schema};

/// Print current crate/schema versions as key=value lines
pub fn run_status(layout: &RepoLayout) -> ReleaseResult<()> {
  let crate_version = manifest::read_version(&layout.manifest())?;
  let schema_version = schema::read_current_version(layout)?;
  let schema_path = layout.schema_artifact(&schema_version.to_string());

  println!("crate_version={}", crate_version);
  println!("schema_version={}", schema_version);
  println!("schema_file={}", schema_path.display());
  println!("schema_file_exists={}", if schema_path.exists() { "yes" } else { "no" });

  Ok(())
}
