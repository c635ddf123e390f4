//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::MirrorConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file (if present) and environment.
    pub fn load() -> Result<MirrorConfig, ConfigError> {
        MergeService::load(None)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<MirrorConfig, ConfigError> {
        MergeService::load(Some(path))
    }

    /// Render a configuration as TOML.
    pub fn render(config: &MirrorConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
