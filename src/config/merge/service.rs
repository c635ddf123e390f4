//! MergeService: orchestrates sources, applies merge policy, deserializes to MirrorConfig.

use crate::config::sources::{config_file, environment};
use crate::config::MirrorConfig;
use config::ConfigError;
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> config file -> environment (highest).
    ///
    /// With no explicit file the global file is used when it exists.
    pub fn load(explicit_file: Option<&Path>) -> Result<MirrorConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = match explicit_file {
            Some(path) => config_file::add_explicit(builder, path)?,
            None => config_file::add_global(builder)?,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
