//! Version control access
//!
//! Everything goes through the system `git` binary; this tool never
//! manipulates git objects in-process.

pub mod system_git;

pub use system_git::SystemGit;
