//! Configuration loading
//!
//! Precedence order (highest to lowest):
//! 1. Environment variable overrides
//! 2. Root config file
//! 3. Built-in defaults

use std::path::Path;

use anyhow::{Context, Result};
use url::Url;

use super::{paths, schema::Config};

/// Environment variables that override file settings
pub const ENV_DGRAPH_URL: &str = "PODGRAPH_DGRAPH_URL";
pub const ENV_DGRAPH_TIMEOUT_SECS: &str = "PODGRAPH_DGRAPH_TIMEOUT_SECS";
pub const ENV_CPU_PRICE: &str = "PODGRAPH_CPU_PRICE";
pub const ENV_MEMORY_PRICE: &str = "PODGRAPH_MEMORY_PRICE";
pub const ENV_STORAGE_PRICE: &str = "PODGRAPH_STORAGE_PRICE";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    pub fn load() -> Result<Config> {
        let config = Self::load_or_default(&paths::root_config_path())?;
        Ok(Self::apply_env_overrides(config))
    }

    /// Load `path` over the defaults, then apply overrides from `env`
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load_from<F>(path: &Path, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::load_or_default(path)?;
        Ok(Self::apply_env_overrides_from(config, env))
    }

    fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load_file(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the root config file and the merged result
    pub fn validate() -> Result<()> {
        let config = Self::load().context("Failed to load configuration")?;
        Self::check(&config)
    }

    /// Check values that parse but cannot be used
    pub fn check(config: &Config) -> Result<()> {
        Url::parse(&config.dgraph.url)
            .with_context(|| format!("dgraph.url is not a valid URL: {}", config.dgraph.url))?;

        if config.dgraph.timeout_secs == 0 {
            return Err(anyhow::anyhow!("dgraph.timeoutSecs must be greater than 0"));
        }

        for (key, price) in [
            ("pricing.cpu", config.pricing.cpu),
            ("pricing.memory", config.pricing.memory),
            ("pricing.storage", config.pricing.storage),
        ] {
            if !price.is_finite() || price < 0.0 {
                return Err(anyhow::anyhow!(
                    "{} must be a non-negative number, got {}",
                    key,
                    price
                ));
            }
        }

        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(config: Config) -> Config {
        Self::apply_env_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// Apply overrides read through `env`
    ///
    /// Values that do not parse are ignored with a warning.
    pub fn apply_env_overrides_from<F>(mut config: Config, env: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env(ENV_DGRAPH_URL) {
            config.dgraph.url = url;
        }

        if let Some(timeout) = parsed(&env, ENV_DGRAPH_TIMEOUT_SECS) {
            config.dgraph.timeout_secs = timeout;
        }

        if let Some(price) = parsed(&env, ENV_CPU_PRICE) {
            config.pricing.cpu = price;
        }

        if let Some(price) = parsed(&env, ENV_MEMORY_PRICE) {
            config.pricing.memory = price;
        }

        if let Some(price) = parsed(&env, ENV_STORAGE_PRICE) {
            config.pricing.storage = price;
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}

fn parsed<F, T>(env: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}: cannot parse '{}'", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_from(&temp.path().join("config.yaml"), no_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "dgraph:\n  url: http://graph:8080\n  bestEffort: false\n").unwrap();

        let config = ConfigLoader::load_from(&path, no_env).unwrap();
        assert_eq!(config.dgraph.url, "http://graph:8080");
        assert!(!config.dgraph.best_effort);
        assert_eq!(config.pricing, Config::default().pricing);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "pricing: [not, a, map]\n").unwrap();

        assert!(ConfigLoader::load_from(&path, no_env).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DGRAPH_URL, "http://override:9080"),
            (ENV_DGRAPH_TIMEOUT_SECS, "30"),
            (ENV_CPU_PRICE, "0.05"),
            (ENV_MEMORY_PRICE, "not-a-number"),
        ]);

        let config = ConfigLoader::apply_env_overrides_from(Config::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.dgraph.url, "http://override:9080");
        assert_eq!(config.dgraph.timeout_secs, 30);
        assert_eq!(config.pricing.cpu, 0.05);
        assert_eq!(config.pricing.memory, Config::default().pricing.memory);
    }

    #[test]
    fn test_process_env_overrides_use_same_rules() {
        let from_process = ConfigLoader::apply_env_overrides(Config::default());
        let injected = ConfigLoader::apply_env_overrides_from(Config::default(), |key| {
            std::env::var(key).ok()
        });
        assert_eq!(from_process, injected);
    }

    #[test]
    fn test_env_beats_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "pricing:\n  storage: 0.5\n").unwrap();

        let config = ConfigLoader::load_from(&path, |key| {
            (key == ENV_STORAGE_PRICE).then(|| "0.25".to_string())
        })
        .unwrap();
        assert_eq!(config.pricing.storage, 0.25);
    }

    #[test]
    fn test_check_rejects_unusable_values() {
        let mut config = Config::default();
        assert!(ConfigLoader::check(&config).is_ok());

        config.dgraph.timeout_secs = 0;
        assert!(ConfigLoader::check(&config).is_err());

        let mut config = Config::default();
        config.pricing.memory = -1.0;
        assert!(ConfigLoader::check(&config).is_err());

        let mut config = Config::default();
        config.dgraph.url = "localhost".to_string();
        assert!(ConfigLoader::check(&config).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.kube.context = Some("staging".to_string());

        ConfigLoader::save(&config, &path).unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), config);
    }
}
