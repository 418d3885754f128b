//! Error types for envgen-release with contextual messages
//!
//! One categorized error type funnels every failure to a single stderr
//! message and process exit 1. Variants carry enough structure for tests to
//! assert on, and several provide a concrete next-step suggestion.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for envgen-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Version resolution and validation errors
  Version(VersionError),

  /// Changelog structure errors
  Changelog(ChangelogError),

  /// Cargo.toml mutation errors
  Manifest(ManifestError),

  /// Schema artifact mutation errors
  Schema(SchemaError),

  /// Tag lifecycle errors
  Tag(TagError),

  /// External command errors (git, brew, gh)
  Command(CommandError),

  /// Tap publication pipeline errors
  Tap(TapError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx = ctx.into();
    match self {
      ReleaseError::Message { message, help } => ReleaseError::Message {
        message: format!("{}: {}", ctx, message),
        help,
      },
      ReleaseError::Io(e) => ReleaseError::Message {
        message: format!("{}: {}", ctx, e),
        help: None,
      },
      other => other,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Version(e) => e.help_message(),
      ReleaseError::Changelog(e) => e.help_message(),
      ReleaseError::Tag(e) => e.help_message(),
      ReleaseError::Tap(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Version(e) => write!(f, "{}", e),
      ReleaseError::Changelog(e) => write!(f, "{}", e),
      ReleaseError::Manifest(e) => write!(f, "{}", e),
      ReleaseError::Schema(e) => write!(f, "{}", e),
      ReleaseError::Tag(e) => write!(f, "{}", e),
      ReleaseError::Command(e) => write!(f, "{}", e),
      ReleaseError::Tap(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<VersionError> for ReleaseError {
  fn from(err: VersionError) -> Self {
    ReleaseError::Version(err)
  }
}

impl From<ChangelogError> for ReleaseError {
  fn from(err: ChangelogError) -> Self {
    ReleaseError::Changelog(err)
  }
}

impl From<ManifestError> for ReleaseError {
  fn from(err: ManifestError) -> Self {
    ReleaseError::Manifest(err)
  }
}

impl From<SchemaError> for ReleaseError {
  fn from(err: SchemaError) -> Self {
    ReleaseError::Schema(err)
  }
}

impl From<TagError> for ReleaseError {
  fn from(err: TagError) -> Self {
    ReleaseError::Tag(err)
  }
}

impl From<CommandError> for ReleaseError {
  fn from(err: CommandError) -> Self {
    ReleaseError::Command(err)
  }
}

impl From<TapError> for ReleaseError {
  fn from(err: TapError) -> Self {
    ReleaseError::Tap(err)
  }
}

/// Version resolution and validation errors
#[derive(Debug, PartialEq, Eq)]
pub enum VersionError {
  /// Neither or both of --level and --version supplied
  AmbiguousInput,

  /// Version string is not strict X.Y.Z
  Invalid { value: String },

  /// Bump level outside patch|minor|major
  UnsupportedLevel { level: String },

  /// Environment override disagrees with on-disk version
  OverrideMismatch {
    source: &'static str,
    on_disk: String,
    requested: String,
  },

  /// Bump target equals current version
  NoChange { version: String },
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::AmbiguousInput => Some("Pass --level patch|minor|major or --version X.Y.Z, not both.".to_string()),
      VersionError::OverrideMismatch { source, .. } => Some(format!(
        "Unset {} or set it to the on-disk version before tagging.",
        source
      )),
      _ => None,
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::AmbiguousInput => {
        write!(f, "Provide exactly one of --level or --version")
      }
      VersionError::Invalid { value } => {
        write!(f, "Invalid version '{}'. Expected strict semver X.Y.Z", value)
      }
      VersionError::UnsupportedLevel { level } => {
        write!(f, "Unsupported level '{}'. Use patch|minor|major", level)
      }
      VersionError::OverrideMismatch {
        source,
        on_disk,
        requested,
      } => {
        write!(
          f,
          "{} override does not match the on-disk version: on disk {}, override requested {}",
          source, on_disk, requested
        )
      }
      VersionError::NoChange { version } => {
        write!(f, "New version matches current version {}; nothing to do", version)
      }
    }
  }
}

/// Changelog structure errors
#[derive(Debug, PartialEq, Eq)]
pub enum ChangelogError {
  /// No '## [Unreleased]' section present
  MissingUnreleased { path: PathBuf },

  /// Unreleased section holds no entries and empty releases were not allowed
  EmptyUnreleased { path: PathBuf },

  /// No dated release section for the version being tagged
  MissingReleaseSection { path: PathBuf, version: String },
}

impl ChangelogError {
  fn help_message(&self) -> Option<String> {
    match self {
      ChangelogError::EmptyUnreleased { .. } => {
        Some("Pass --allow-empty-changelog to release without pending entries.".to_string())
      }
      ChangelogError::MissingReleaseSection { version, .. } => Some(format!(
        "Run `envgen-release bump` first so the changelog gains a '## [{}] - <date>' section.",
        version
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ChangelogError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChangelogError::MissingUnreleased { path } => {
        write!(f, "Missing '## [Unreleased]' section in {}", path.display())
      }
      ChangelogError::EmptyUnreleased { path } => {
        write!(f, "Unreleased section in {} has no entries", path.display())
      }
      ChangelogError::MissingReleaseSection { path, version } => {
        write!(
          f,
          "Missing release section '## [{}] - YYYY-MM-DD' in {}",
          version,
          path.display()
        )
      }
    }
  }
}

/// Cargo.toml mutation errors
#[derive(Debug, PartialEq, Eq)]
pub enum ManifestError {
  /// No [package] section in the manifest
  PackageSectionMissing { path: PathBuf },

  /// No version entry inside the [package] section
  VersionFieldMissing { path: PathBuf },

  /// Manifest failed to parse before the edit
  Unparseable { detail: String },

  /// The rewritten manifest no longer parses
  CorruptedAfterEdit { detail: String },
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::PackageSectionMissing { path } => {
        write!(f, "[package] section not found in {}", path.display())
      }
      ManifestError::VersionFieldMissing { path } => {
        write!(f, "version entry not found in [package] section of {}", path.display())
      }
      ManifestError::Unparseable { detail } => {
        write!(f, "Could not parse manifest: {}", detail)
      }
      ManifestError::CorruptedAfterEdit { detail } => {
        write!(f, "Generated invalid manifest while updating version: {}", detail)
      }
    }
  }
}

/// Schema artifact mutation errors
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaError {
  /// Artifact for the current version is absent
  CurrentArtifactMissing { path: PathBuf },

  /// Artifact for the target version already exists
  TargetArtifactExists { path: PathBuf },

  /// The embedded version marker does not occur exactly once
  MarkerCount { found: usize },

  /// The rewritten artifact is not valid JSON
  InvalidJson { detail: String },

  /// SCHEMA_VERSION file is absent
  VersionFileMissing { path: PathBuf },
}

impl fmt::Display for SchemaError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SchemaError::CurrentArtifactMissing { path } => {
        write!(f, "Current schema file does not exist: {}", path.display())
      }
      SchemaError::TargetArtifactExists { path } => {
        write!(f, "Target schema file already exists: {}", path.display())
      }
      SchemaError::MarkerCount { found } => {
        write!(
          f,
          "Schema JSON does not contain exactly one \"x-envgen-schema-version\" field (found {})",
          found
        )
      }
      SchemaError::InvalidJson { detail } => {
        write!(f, "Updated schema JSON is invalid: {}", detail)
      }
      SchemaError::VersionFileMissing { path } => {
        write!(f, "Missing schema version file: {}", path.display())
      }
    }
  }
}

/// Tag lifecycle errors
#[derive(Debug, PartialEq, Eq)]
pub enum TagError {
  /// Tag already exists locally
  AlreadyExists { tag: String },

  /// Tag was never created locally
  NotCreated { tag: String },

  /// Tag already exists on the remote
  AlreadyOnRemote { tag: String },

  /// Querying the remote failed
  RemoteQueryFailed { tag: String, detail: String },
}

impl TagError {
  fn help_message(&self) -> Option<String> {
    match self {
      TagError::NotCreated { tag } => Some(format!("Create {} first with `envgen-release tag`.", tag)),
      TagError::AlreadyOnRemote { .. } => {
        Some("Pushed tags are immutable. Bump to a new version instead of re-pushing.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for TagError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TagError::AlreadyExists { tag } => {
        write!(f, "Local tag already exists: {}", tag)
      }
      TagError::NotCreated { tag } => {
        write!(f, "Local tag does not exist: {}", tag)
      }
      TagError::AlreadyOnRemote { tag } => {
        write!(f, "Remote tag already exists on origin: {}", tag)
      }
      TagError::RemoteQueryFailed { tag, detail } => {
        write!(f, "Failed to query remote tags for '{}': {}", tag, detail)
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub enum CommandError {
  /// Command exited non-zero
  Failed { command: String, detail: String },

  /// Command binary not found on PATH
  NotFound { program: String },
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::Failed { command, detail } => {
        if detail.is_empty() {
          write!(f, "Command failed: {}", command)
        } else {
          write!(f, "Command failed: {}\n{}", command, detail)
        }
      }
      CommandError::NotFound { program } => {
        write!(f, "`{}` is required but was not found on PATH", program)
      }
    }
  }
}

/// Tap publication pipeline errors
#[derive(Debug)]
pub enum TapError {
  /// Tag does not look like vX.Y.Z
  InvalidTag { tag: String },

  /// Tap repo is not owner/repo shaped
  InvalidTapRepo { repo: String },

  /// Download failed after exhausting all attempts
  DownloadFailed { url: String, attempts: u32, detail: String },

  /// Sidecar file is absent
  SidecarMissing { path: PathBuf },

  /// Sidecar is missing a required field or failed to parse
  SidecarInvalid { path: PathBuf, detail: String },

  /// Sidecar was produced for a different tag
  SidecarTagMismatch { expected: String, found: String },

  /// Neither a sidecar nor an explicit hash supplied
  MissingHashInput,

  /// Tap repository directory does not exist
  TapRepoDirMissing { path: PathBuf },

  /// Formula file does not exist
  FormulaMissing { path: PathBuf },
}

impl TapError {
  fn help_message(&self) -> Option<String> {
    match self {
      TapError::SidecarMissing { .. } => {
        Some("Run `envgen-release tap resolve-source --tag vX.Y.Z` first.".to_string())
      }
      TapError::MissingHashInput => Some("Provide either --source-json or --sha256.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for TapError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TapError::InvalidTag { tag } => {
        write!(f, "Invalid tag '{}'. Expected vX.Y.Z", tag)
      }
      TapError::InvalidTapRepo { repo } => {
        write!(f, "Invalid tap repo '{}'. Expected owner/repo", repo)
      }
      TapError::DownloadFailed { url, attempts, detail } => {
        write!(
          f,
          "Failed to download source tarball from {} after {} attempts: {}",
          url, attempts, detail
        )
      }
      TapError::SidecarMissing { path } => {
        write!(f, "Source metadata JSON does not exist: {}", path.display())
      }
      TapError::SidecarInvalid { path, detail } => {
        write!(f, "Invalid source metadata JSON {}: {}", path.display(), detail)
      }
      TapError::SidecarTagMismatch { expected, found } => {
        write!(f, "Source metadata tag mismatch: expected {}, found {}", expected, found)
      }
      TapError::MissingHashInput => {
        write!(f, "No content hash available for formula sync")
      }
      TapError::TapRepoDirMissing { path } => {
        write!(f, "Tap repo directory does not exist: {}", path.display())
      }
      TapError::FormulaMissing { path } => {
        write!(f, "Formula file does not exist: {}", path.display())
      }
    }
  }
}

/// Result type alias for envgen-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("ERROR: {}", error);

  if let Some(help) = error.help_message() {
    eprintln!("\nHelp: {}", help);
  }
}
