//! Source resolution: download the release tarball, hash it, persist the
//! sidecar
//!
//! The sidecar is the handoff contract between pipeline stages. It is written
//! once per resolution (atomically, keys sorted, trailing newline) and only
//! superseded by re-running resolution, never edited.

use crate::core::error::{ReleaseResult, ResultExt, TapError};
use crate::tap::tarball_url;
use crate::utils::write_atomic_with_parents;
use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const DOWNLOAD_CHUNK: usize = 1024 * 1024;

/// Default download attempt count
pub const DEFAULT_ATTEMPTS: u32 = 5;

/// Default sleep between attempts, in seconds
pub const DEFAULT_SLEEP_SECONDS: f64 = 3.0;

/// Persisted publication state, one file per resolved tag
///
/// Field order is the serialized key order; keep it alphabetical so the
/// on-disk shape stays diff-stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
  pub created_at_utc: String,
  pub download_path: String,
  pub requested_url: String,
  pub resolved_url: String,
  pub sha256: String,
  pub size_bytes: u64,
  pub source_repo: String,
  pub tag: String,
  pub version: String,
}

impl SourceMetadata {
  /// Load and validate a sidecar file
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    if !path.exists() {
      return Err(
        TapError::SidecarMissing {
          path: path.to_path_buf(),
        }
        .into(),
      );
    }

    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| {
      TapError::SidecarInvalid {
        path: path.to_path_buf(),
        detail: e.to_string(),
      }
      .into()
    })
  }

  /// Persist atomically as pretty JSON with a trailing newline
  pub fn store(&self, path: &Path) -> ReleaseResult<()> {
    let json = serde_json::to_string_pretty(self)?;
    write_atomic_with_parents(path, &format!("{}\n", json))
  }
}

/// Inputs for one source resolution
pub struct ResolveRequest {
  pub tag: String,
  pub version: Version,
  pub source_repo: String,
  pub source_dir: PathBuf,
  pub out_json: PathBuf,
  pub attempts: u32,
  pub sleep_seconds: f64,
}

/// Download the tarball for a tag, hash it, and write the sidecar
pub fn resolve(request: &ResolveRequest) -> ReleaseResult<SourceMetadata> {
  let requested_url = tarball_url(&request.source_repo, &request.tag);
  let download_path = request.source_dir.join(format!("envgen-{}.tar.gz", request.version));

  fs::create_dir_all(&request.source_dir)
    .with_context(|| format!("Failed to create {}", request.source_dir.display()))?;

  let outcome = download_with_retries(&requested_url, &download_path, request.attempts, request.sleep_seconds)?;

  let metadata = SourceMetadata {
    created_at_utc: chrono::Utc::now()
      .to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
    download_path: absolute_display(&download_path),
    requested_url,
    resolved_url: outcome.resolved_url,
    sha256: outcome.sha256,
    size_bytes: outcome.size_bytes,
    source_repo: request.source_repo.clone(),
    tag: request.tag.clone(),
    version: request.version.to_string(),
  };

  metadata.store(&request.out_json)?;
  Ok(metadata)
}

struct DownloadOutcome {
  resolved_url: String,
  sha256: String,
  size_bytes: u64,
}

/// Fetch `url` to `destination` with a fixed attempt count and fixed sleep
///
/// No backoff, no jitter. The hash is computed over the bytes as they
/// stream to disk.
fn download_with_retries(url: &str, destination: &Path, attempts: u32, sleep_seconds: f64) -> ReleaseResult<DownloadOutcome> {
  let attempts = attempts.max(1);
  let agent = ureq::AgentBuilder::new()
    .timeout(DOWNLOAD_TIMEOUT)
    .user_agent(concat!("envgen-release/", env!("CARGO_PKG_VERSION")))
    .build();

  let mut last_error = String::new();
  for attempt in 1..=attempts {
    match fetch_once(&agent, url, destination) {
      Ok(outcome) => return Ok(outcome),
      Err(e) => {
        last_error = e;
        if attempt < attempts {
          std::thread::sleep(Duration::from_secs_f64(sleep_seconds));
        }
      }
    }
  }

  Err(
    TapError::DownloadFailed {
      url: url.to_string(),
      attempts,
      detail: last_error,
    }
    .into(),
  )
}

fn fetch_once(agent: &ureq::Agent, url: &str, destination: &Path) -> Result<DownloadOutcome, String> {
  let response = agent.get(url).call().map_err(|e| e.to_string())?;
  let resolved_url = response.get_url().to_string();

  let mut reader = response.into_reader();
  let mut file = fs::File::create(destination).map_err(|e| e.to_string())?;
  let mut hasher = Sha256::new();
  let mut buffer = vec![0u8; DOWNLOAD_CHUNK];
  let mut size_bytes: u64 = 0;

  loop {
    let read = reader.read(&mut buffer).map_err(|e| e.to_string())?;
    if read == 0 {
      break;
    }
    hasher.update(&buffer[..read]);
    file.write_all(&buffer[..read]).map_err(|e| e.to_string())?;
    size_bytes += read as u64;
  }
  file.flush().map_err(|e| e.to_string())?;

  Ok(DownloadOutcome {
    resolved_url,
    sha256: format!("{:x}", hasher.finalize()),
    size_bytes,
  })
}

fn absolute_display(path: &Path) -> String {
  fs::canonicalize(path)
    .unwrap_or_else(|_| path.to_path_buf())
    .display()
    .to_string()
}
