use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const GUARD_DIR: &str = ".thinkguard";
pub const CONFIG_FILE: &str = ".thinkguard/config.yaml";

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "THINKGUARD_CONFIG";
/// Env var that turns on repair-count diagnostics.
pub const DEBUG_ENV: &str = "THINKGUARD_DEBUG";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// `~/.thinkguard/config.yaml`, when a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    home::home_dir().map(|h| config_path(&h))
}
