//! External command execution
//!
//! git, brew and gh are consumed strictly through their CLI contracts: exit 0
//! is success, anything else aborts the current command with the tool's own
//! stderr/stdout surfaced verbatim.

use crate::core::error::{CommandError, ReleaseResult};
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Run a command with inherited stdio, failing on non-zero exit
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> ReleaseResult<()> {
  let mut cmd = Command::new(program);
  cmd.args(args);
  if let Some(dir) = cwd {
    cmd.current_dir(dir);
  }

  let status = cmd.status().map_err(|e| spawn_error(program, e))?;

  if !status.success() {
    return Err(
      CommandError::Failed {
        command: display_command(program, args),
        detail: status
          .code()
          .map(|c| format!("exit code {}", c))
          .unwrap_or_else(|| "terminated by signal".to_string()),
      }
      .into(),
    );
  }

  Ok(())
}

/// Run a command capturing stdout, failing on non-zero exit
pub fn run_capture(program: &str, args: &[&str], cwd: Option<&Path>) -> ReleaseResult<String> {
  let output = output_of(program, args, cwd)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let detail = if !stderr.is_empty() {
      stderr
    } else if !stdout.is_empty() {
      stdout
    } else {
      output
        .status
        .code()
        .map(|c| format!("exit code {}", c))
        .unwrap_or_else(|| "terminated by signal".to_string())
    };
    return Err(
      CommandError::Failed {
        command: display_command(program, args),
        detail,
      }
      .into(),
    );
  }

  Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Whether a program can be spawned at all (PATH probe)
pub fn available(program: &str) -> bool {
  Command::new(program)
    .arg("--version")
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .is_ok()
}

/// Render a command line for dry-run echo and error messages
pub fn display_command(program: &str, args: &[&str]) -> String {
  let mut parts = vec![quote(program)];
  parts.extend(args.iter().map(|a| quote(a)));
  parts.join(" ")
}

fn output_of(program: &str, args: &[&str], cwd: Option<&Path>) -> ReleaseResult<Output> {
  let mut cmd = Command::new(program);
  cmd.args(args);
  if let Some(dir) = cwd {
    cmd.current_dir(dir);
  }
  cmd.output().map_err(|e| spawn_error(program, e))
}

fn spawn_error(program: &str, err: std::io::Error) -> crate::core::error::ReleaseError {
  if err.kind() == std::io::ErrorKind::NotFound {
    CommandError::NotFound {
      program: program.to_string(),
    }
    .into()
  } else {
    CommandError::Failed {
      command: program.to_string(),
      detail: err.to_string(),
    }
    .into()
  }
}

fn quote(part: &str) -> String {
  if part.is_empty() || part.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
    format!("'{}'", part.replace('\'', "'\\''"))
  } else {
    part.to_string()
  }
}
