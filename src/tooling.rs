//! Tooling & Integration Layer
//!
//! Command-line entry points over the synchronization engine.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
