use std::path::{Path, PathBuf};
use thinkguard_core::paths;

/// Resolve which config file to use.
///
/// Priority:
/// 1. `--config` flag / `THINKGUARD_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.thinkguard/config.yaml`
/// 3. `~/.thinkguard/config.yaml`
/// 4. `None` (built-in defaults)
///
/// An explicit path is returned even if it does not exist, so loading it
/// reports the missing file instead of silently falling back.
pub fn resolve_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(found) = find_upward(&cwd) {
        return Some(found);
    }

    paths::user_config_path().filter(|p| p.is_file())
}

/// Nearest `.thinkguard/config.yaml` at or above `start`.
pub fn find_upward(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(paths::config_path)
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_config_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        assert_eq!(resolve_config(Some(&path)), Some(path));
    }

    #[test]
    fn finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let cfg = paths::config_path(dir.path());
        std::fs::create_dir_all(cfg.parent().unwrap()).unwrap();
        std::fs::write(&cfg, "version: 1\n").unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_upward(&subdir), Some(cfg));
    }

    #[test]
    fn ignores_guard_dir_without_config() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(paths::GUARD_DIR)).unwrap();
        assert_eq!(find_upward(dir.path()), None);
    }
}
