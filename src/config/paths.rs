//! Where podgraph keeps its settings
//!
//! podgraph has a single settings file, `config.yaml`, holding the Dgraph
//! endpoint, unit prices and the kube context. Nothing else is written there.

use std::path::{Path, PathBuf};

/// Overrides the directory holding `config.yaml`
pub const ENV_CONFIG_DIR: &str = "PODGRAPH_CONFIG_DIR";

const APP_DIR: &str = "podgraph";

/// Directory holding `config.yaml`
///
/// `$PODGRAPH_CONFIG_DIR` when set. Otherwise `$XDG_CONFIG_HOME/podgraph` or
/// `~/.config/podgraph` on Unix, and the roaming app data folder on Windows.
pub fn config_dir() -> PathBuf {
    config_dir_from(|key| std::env::var(key).ok())
}

fn config_dir_from<F>(env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env(ENV_CONFIG_DIR) {
        return PathBuf::from(dir);
    }
    platform_config_home(&env).join(APP_DIR)
}

#[cfg(not(windows))]
fn platform_config_home<F>(env: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
}

#[cfg(windows)]
fn platform_config_home<F>(_env: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".config"))
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
