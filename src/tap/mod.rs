//! Homebrew tap publication pipeline
//!
//! Four independently re-runnable stages: resolve source, sync formula,
//! verify formula, open/update the tap pull request. Stages communicate
//! through the source metadata sidecar, never through memory.

pub mod formula;
pub mod hints;
pub mod pr;
pub mod source;
pub mod verify;

use crate::core::error::{ReleaseResult, TapError};
use regex::Regex;
use semver::Version;

/// GitHub repository the source tarballs come from
pub const DEFAULT_SOURCE_REPO: &str = "smorinlabs/envgen";

/// GitHub repository hosting the Homebrew tap
pub const DEFAULT_TAP_REPO: &str = "smorinlabs/homebrew-tap";

/// Formula file path inside the tap repository
pub const DEFAULT_FORMULA_PATH: &str = "Formula/envgen.rb";

fn tag_re() -> Regex {
  Regex::new(r"^v(\d+\.\d+\.\d+)(?:[.-].*)?$").expect("static regex")
}

/// Extract the X.Y.Z version from a release tag
///
/// Accepts suffixed tags like `v1.2.3-rc.1` (the suffix is dropped); the
/// bump path never produces them but historical tags may carry them.
pub fn parse_tag(tag: &str) -> ReleaseResult<Version> {
  let trimmed = tag.trim();
  let caps = tag_re().captures(trimmed).ok_or_else(|| TapError::InvalidTag {
    tag: tag.to_string(),
  })?;

  Version::parse(&caps[1]).map_err(|_| {
    TapError::InvalidTag {
      tag: tag.to_string(),
    }
    .into()
  })
}

/// Canonical source tarball URL for a tag
pub fn tarball_url(source_repo: &str, tag: &str) -> String {
  format!("https://github.com/{}/archive/refs/tags/{}.tar.gz", source_repo, tag)
}

/// Convert `owner/homebrew-name` into the `owner/name` form brew expects
pub fn tap_name(tap_repo: &str) -> ReleaseResult<String> {
  let Some((owner, repo)) = tap_repo.split_once('/') else {
    return Err(
      TapError::InvalidTapRepo {
        repo: tap_repo.to_string(),
      }
      .into(),
    );
  };

  let short = repo.strip_prefix("homebrew-").unwrap_or(repo);
  Ok(format!("{}/{}", owner, short))
}
