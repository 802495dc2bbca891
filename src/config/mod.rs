//! Configuration system for podgraph
//!
//! A single YAML file in the config directory, layered over built-in
//! defaults and overridden by `PODGRAPH_*` environment variables.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, DgraphConfig, KubeConfig, PricingConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "dgraph.url" => Ok(config.dgraph.url.clone()),
        "dgraph.timeoutSecs" => Ok(config.dgraph.timeout_secs.to_string()),
        "dgraph.bestEffort" => Ok(config.dgraph.best_effort.to_string()),
        "pricing.cpu" => Ok(config.pricing.cpu.to_string()),
        "pricing.memory" => Ok(config.pricing.memory.to_string()),
        "pricing.storage" => Ok(config.pricing.storage.to_string()),
        "kube.context" => Ok(config.kube.context.clone().unwrap_or_default()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "dgraph.url" => {
            config.dgraph.url = value.to_string();
        }
        "dgraph.timeoutSecs" => {
            config.dgraph.timeout_secs = value
                .parse()
                .context("dgraph.timeoutSecs must be a number")?;
        }
        "dgraph.bestEffort" => {
            config.dgraph.best_effort = value
                .parse()
                .context("dgraph.bestEffort must be 'true' or 'false'")?;
        }
        "pricing.cpu" => {
            config.pricing.cpu = value.parse().context("pricing.cpu must be a number")?;
        }
        "pricing.memory" => {
            config.pricing.memory = value.parse().context("pricing.memory must be a number")?;
        }
        "pricing.storage" => {
            config.pricing.storage = value.parse().context("pricing.storage must be a number")?;
        }
        "kube.context" => {
            if value.is_empty() {
                config.kube.context = None;
            } else {
                config.kube.context = Some(value.to_string());
            }
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    ConfigLoader::check(config)
}
