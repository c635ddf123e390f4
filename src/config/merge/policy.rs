//! Built-in defaults every configuration starts from.

use crate::config::{
    DEFAULT_INTERVAL_SECS, DEFAULT_LOG_FILE, DEFAULT_REPLICA_DIR, DEFAULT_SOURCE_DIR,
};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder preloaded with the defaults for every `sync.*` key.
pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("sync.source", DEFAULT_SOURCE_DIR)?
        .set_default("sync.replica", DEFAULT_REPLICA_DIR)?
        .set_default("sync.interval_secs", DEFAULT_INTERVAL_SECS)?
        .set_default("sync.log_file", DEFAULT_LOG_FILE)
}
