mod commands;
mod core;
mod release;
mod tap;
mod utils;

use crate::commands::tap::TapCommand;
use crate::core::env::EnvConfig;
use crate::core::error::{ReleaseResult, ResultExt, print_error};
use crate::core::layout::RepoLayout;
use crate::release::Track;
use crate::release::version::BumpLevel;
use clap::{Parser, Subcommand, ValueEnum};

/// Release automation for envgen: version bumps, tags, and tap publication
#[derive(Parser)]
#[command(name = "envgen-release")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

/// Release track selector
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrackArg {
  /// The crate, versioned in Cargo.toml
  Crate,
  /// The schema artifact, versioned in SCHEMA_VERSION
  Schema,
}

impl From<TrackArg> for Track {
  fn from(value: TrackArg) -> Self {
    match value {
      TrackArg::Crate => Track::Crate,
      TrackArg::Schema => Track::Schema,
    }
  }
}

/// Version bump level
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
  Patch,
  Minor,
  Major,
}

impl From<LevelArg> for BumpLevel {
  fn from(value: LevelArg) -> Self {
    match value {
      LevelArg::Patch => BumpLevel::Patch,
      LevelArg::Minor => BumpLevel::Minor,
      LevelArg::Major => BumpLevel::Major,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Show current crate/schema versions
  Status,

  /// Bump a track's version and rotate its changelog
  ///
  /// Provide exactly one of --level or --version. Bumping rewrites the
  /// version artifact and moves the changelog's unreleased entries into a
  /// dated release section. Tags are a separate step.
  Bump {
    /// Track to bump
    #[arg(value_enum)]
    track: TrackArg,

    /// Bump level relative to the current version
    #[arg(long, value_enum)]
    level: Option<LevelArg>,

    /// Explicit target version (X.Y.Z)
    #[arg(long)]
    version: Option<String>,

    /// Allow releasing with an empty unreleased section
    #[arg(long)]
    allow_empty_changelog: bool,

    /// Show what would change without writing
    #[arg(long)]
    dry_run: bool,
  },

  /// Create the local annotated release tag for a track
  ///
  /// Requires the track changelog to already contain a dated release
  /// section for the version being tagged.
  Tag {
    /// Track to tag
    #[arg(value_enum)]
    track: TrackArg,

    /// Print the git command without running it
    #[arg(long)]
    dry_run: bool,
  },

  /// Push an existing release tag to origin
  PushTag {
    /// Track whose tag to push
    #[arg(value_enum)]
    track: TrackArg,

    /// Print the git command without running it
    #[arg(long)]
    dry_run: bool,
  },

  /// Homebrew tap publication pipeline
  Tap {
    #[command(subcommand)]
    command: TapCommand,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(error) = run(cli) {
    print_error(&error);
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> ReleaseResult<()> {
  let layout = RepoLayout::at(std::env::current_dir().context("Failed to resolve current directory")?);
  let env = EnvConfig::from_env();

  match cli.command {
    Commands::Status => commands::status::run_status(&layout),

    Commands::Bump {
      track,
      level,
      version,
      allow_empty_changelog,
      dry_run,
    } => commands::bump::run_bump(
      &layout,
      track.into(),
      level.map(Into::into),
      version.as_deref(),
      allow_empty_changelog,
      dry_run,
    ),

    Commands::Tag { track, dry_run } => commands::tag::run_tag(&layout, &env, track.into(), dry_run),

    Commands::PushTag { track, dry_run } => commands::tag::run_push_tag(&layout, &env, track.into(), dry_run),

    Commands::Tap { command } => command.execute(&layout, &env),
  }
}
