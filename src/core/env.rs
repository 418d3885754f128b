//! Environment-derived configuration, resolved once at startup
//!
//! Commands never read the process environment directly; everything they need
//! is captured here and passed down. Precedence for hint display: explicit
//! `ENVGEN_HINTS` override, then CI detection, then terminal detection.

use std::env;
use std::io::IsTerminal;

const TRUTHY: &[&str] = &["1", "true", "yes", "on"];
const FALSY: &[&str] = &["", "0", "false", "no", "off"];

/// Snapshot of every environment input the release flow honors
#[derive(Debug, Clone)]
pub struct EnvConfig {
  /// Tri-state ENVGEN_HINTS override (None when unset or unrecognized)
  pub hints_override: Option<bool>,

  /// CI environment detected via a truthy `CI` variable
  pub ci: bool,

  /// Whether stdout is an interactive terminal
  pub stdout_tty: bool,

  /// VERSION override for crate tagging
  pub crate_version_override: Option<String>,

  /// SCHEMA_VERSION override for schema tagging
  pub schema_version_override: Option<String>,
}

impl EnvConfig {
  /// Resolve from the process environment
  pub fn from_env() -> Self {
    Self::resolve(
      env::var("ENVGEN_HINTS").ok().as_deref(),
      env::var("CI").ok().as_deref(),
      std::io::stdout().is_terminal(),
      env::var("VERSION").ok().as_deref(),
      env::var("SCHEMA_VERSION").ok().as_deref(),
    )
  }

  /// Pure resolution from raw values (direct test surface)
  pub fn resolve(
    hints: Option<&str>,
    ci: Option<&str>,
    stdout_tty: bool,
    crate_override: Option<&str>,
    schema_override: Option<&str>,
  ) -> Self {
    Self {
      hints_override: hints.and_then(parse_tristate),
      ci: ci.map(is_truthy).unwrap_or(false),
      stdout_tty,
      crate_version_override: non_empty(crate_override),
      schema_version_override: non_empty(schema_override),
    }
  }

  /// Whether advisory next-step hints should print
  pub fn hints_enabled(&self) -> bool {
    if let Some(forced) = self.hints_override {
      return forced;
    }
    if self.ci {
      return false;
    }
    self.stdout_tty
  }
}

fn is_truthy(value: &str) -> bool {
  !FALSY.contains(&value.trim().to_lowercase().as_str())
}

fn parse_tristate(value: &str) -> Option<bool> {
  let normalized = value.trim().to_lowercase();
  if TRUTHY.contains(&normalized.as_str()) {
    Some(true)
  } else if FALSY.contains(&normalized.as_str()) {
    Some(false)
  } else {
    None
  }
}

fn non_empty(value: Option<&str>) -> Option<String> {
  value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}
