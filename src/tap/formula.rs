//! Formula rendering and idempotent sync
//!
//! The formula is generated text keyed by (source URL, content hash). Sync
//! compares the rendered text against the on-disk file and writes only when
//! they differ, so re-running the stage with unchanged inputs is a no-op.

use crate::core::error::{ReleaseResult, ResultExt};
use crate::utils::write_atomic_with_parents;
use std::fs;
use std::path::Path;

/// Render the Homebrew formula for a source tarball
pub fn render(source_url: &str, sha256: &str) -> String {
  format!(
    r##"class Envgen < Formula
  desc "Generate .env files from declarative YAML schemas"
  homepage "https://github.com/smorinlabs/envgen"
  url "{source_url}"
  sha256 "{sha256}"
  license "MIT"
  head "https://github.com/smorinlabs/envgen.git", branch: "main"

  depends_on "rust" => :build

  def install
    system "cargo", "install", *std_cargo_args
  end

  test do
    (testpath/"envgen.yaml").write <<~YAML
      schema_version: "2"
      metadata:
        description: "Homebrew test schema"
        destination:
          local: ".env.local"
      environments:
        local: {{}}
      sources: {{}}
      variables:
        APP_NAME:
          description: "App name"
          source: static
          values:
            local: "envgen"
    YAML

    system bin/"envgen", "check", "-c", "envgen.yaml"
    system bin/"envgen", "pull", "-c", "envgen.yaml", "-e", "local", "--force"
    assert_match "APP_NAME=envgen", (testpath/".env.local").read
    assert_match version.to_s, shell_output("#{{bin}}/envgen --version")
  end
end
"##
  )
}

/// Result of one sync pass
pub struct SyncOutcome {
  /// Whether the rendered text differed from the on-disk file
  pub changed: bool,
}

/// Write the rendered formula if and only if it differs from disk
pub fn sync(formula_path: &Path, source_url: &str, sha256: &str, dry_run: bool) -> ReleaseResult<SyncOutcome> {
  let new_content = render(source_url, sha256);

  let old_content = if formula_path.exists() {
    fs::read_to_string(formula_path).with_context(|| format!("Failed to read {}", formula_path.display()))?
  } else {
    String::new()
  };
  let changed = old_content != new_content;

  if dry_run {
    if changed {
      println!("[dry-run] write formula: {}", formula_path.display());
    } else {
      println!("[dry-run] no formula changes: {}", formula_path.display());
    }
  } else if changed {
    write_atomic_with_parents(formula_path, &new_content)?;
  }

  Ok(SyncOutcome { changed })
}
