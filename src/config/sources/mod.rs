//! Configuration sources.

pub mod config_file;
pub mod environment;
