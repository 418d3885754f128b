//! Formula verification via brew
//!
//! Runs lint, audit, install and test in that fixed order against a
//! temporary custom-remote tap registration. The first non-zero exit stops
//! the sequence; there is no partial credit.

use crate::core::error::{CommandError, ReleaseResult, TapError};
use crate::core::process;
use crate::tap::tap_name;
use std::path::{Path, PathBuf};

/// Inputs for one verification pass
pub struct VerifyRequest {
  pub tap_repo: String,
  pub tap_repo_dir: PathBuf,
  pub formula_path: PathBuf,
}

/// Run the full brew verification sequence, returning the formula path
pub fn verify(request: &VerifyRequest) -> ReleaseResult<PathBuf> {
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

  if !process::available("brew") {
    return Err(
      CommandError::NotFound {
        program: "brew".to_string(),
      }
      .into(),
    );
  }

  let tap = tap_name(&request.tap_repo)?;
  let formula_name = formula_stem(&request.formula_path);
  let tapped_formula = format!("{}/{}", tap, formula_name);
  let tap_dir = request.tap_repo_dir.display().to_string();
  let formula_rel = request.formula_path.display().to_string();

  process::run("brew", &["tap", "--custom-remote", &tap, &tap_dir], None)?;
  process::run("brew", &["style", &formula_rel], Some(request.tap_repo_dir.as_path()))?;
  process::run("brew", &["audit", "--strict", "--tap", &tap, &formula_name], None)?;
  process::run("brew", &["install", "--build-from-source", &tapped_formula], None)?;
  process::run("brew", &["test", &tapped_formula], None)?;

  Ok(request.tap_repo_dir.join(&request.formula_path))
}

fn formula_stem(path: &Path) -> String {
  path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default()
}
