//! Tooling & Integration Layer
//!
//! Command-line front end and text rendering for the virtual file system.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
