//! Core infrastructure: errors, environment config, repo layout, subprocesses

pub mod env;
pub mod error;
pub mod layout;
pub mod process;
pub mod vcs;
