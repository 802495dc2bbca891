//! Configuration schema definitions
//!
//! Defines the structure of `config.yaml` using serde. Every field has a
//! default, so a partial file (or none at all) is a complete configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DGRAPH_URL, DEFAULT_QUERY_TIMEOUT_SECS};
use crate::cost::UnitPrices;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Graph store connection
    #[serde(default)]
    pub dgraph: DgraphConfig,

    /// Fallback unit prices
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Kubernetes connection
    #[serde(default)]
    pub kube: KubeConfig,
}

/// Graph store connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DgraphConfig {
    /// Base URL of the Dgraph alpha HTTP endpoint
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-query timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Allow best-effort reads
    #[serde(default = "default_true")]
    pub best_effort: bool,
}

/// Unit prices applied wherever the graph holds none
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PricingConfig {
    /// Per CPU core-hour
    #[serde(default = "default_cpu_price")]
    pub cpu: f64,

    /// Per GB-hour of memory
    #[serde(default = "default_memory_price")]
    pub memory: f64,

    /// Per GB-hour of persistent storage
    #[serde(default = "default_storage_price")]
    pub storage: f64,
}

/// Kubernetes connection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KubeConfig {
    /// Kubeconfig context; the current context when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl PricingConfig {
    pub fn unit_prices(&self) -> UnitPrices {
        UnitPrices {
            cpu: self.cpu,
            memory: self.memory,
            storage: self.storage,
        }
    }
}

// Default value functions
fn default_url() -> String {
    DEFAULT_DGRAPH_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_QUERY_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_cpu_price() -> f64 {
    UnitPrices::default().cpu
}

fn default_memory_price() -> f64 {
    UnitPrices::default().memory
}

fn default_storage_price() -> f64 {
    UnitPrices::default().storage
}

impl Default for DgraphConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            best_effort: default_true(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cpu: default_cpu_price(),
            memory: default_memory_price(),
            storage: default_storage_price(),
        }
    }
}
