//! Platform configuration directory lookup.

use std::path::PathBuf;

/// Global config file, e.g. `~/.config/treemirror/config.toml` on Linux.
///
/// `$XDG_CONFIG_HOME` wins when set so tests and sandboxes can redirect it.
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Some(
                PathBuf::from(xdg_config_home)
                    .join("treemirror")
                    .join("config.toml"),
            );
        }
    }
    directories::ProjectDirs::from("", "", "treemirror")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
