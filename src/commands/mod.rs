//! Subcommand implementations

pub mod bump;
pub mod status;
pub mod tag;
pub mod tap;
