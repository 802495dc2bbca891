//! Cost attribution
//!
//! Attributes a share of a node's compute cost, plus the pod's own claimed
//! storage, to a single pod:
//!
//! ```text
//! cpu     = cpu price     * node cpu capacity    * node cost percentage
//! memory  = memory price  * node memory capacity * node cost percentage
//! storage = storage price * claimed storage
//! total   = cpu + memory + storage
//! ```
//!
//! Prices missing from the graph are replaced by fallback unit prices before
//! any multiplication, so every function here is total and pure.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CAPACITY, DEFAULT_CPU_PRICE_PER_CORE_HOUR, DEFAULT_MEMORY_PRICE_PER_GB_HOUR,
    DEFAULT_NODE_COST_PERCENTAGE, DEFAULT_STORAGE_PRICE_PER_GB_HOUR, PRICE_PRECISION,
};
use crate::models::{Cost, PodCostRecord};

/// Price per resource unit per hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPrices {
    /// Per CPU core
    pub cpu: f64,
    /// Per GB of memory
    pub memory: f64,
    /// Per GB of persistent storage
    pub storage: f64,
}

impl Default for UnitPrices {
    fn default() -> Self {
        Self {
            cpu: DEFAULT_CPU_PRICE_PER_CORE_HOUR,
            memory: DEFAULT_MEMORY_PRICE_PER_GB_HOUR,
            storage: DEFAULT_STORAGE_PRICE_PER_GB_HOUR,
        }
    }
}

impl UnitPrices {
    /// Combine stored per-pod prices with fallbacks
    ///
    /// Each stored price is used only if present, finite and non-negative;
    /// otherwise the matching fallback is taken. Storage is never stored per
    /// pod and always comes from `fallback`.
    pub fn resolve(cpu: Option<f64>, memory: Option<f64>, fallback: &UnitPrices) -> Self {
        Self {
            cpu: usable(cpu).unwrap_or(fallback.cpu),
            memory: usable(memory).unwrap_or(fallback.memory),
            storage: fallback.storage,
        }
    }

    /// Replace negative or non-finite prices with the documented defaults
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            cpu: usable(Some(self.cpu)).unwrap_or(defaults.cpu),
            memory: usable(Some(self.memory)).unwrap_or(defaults.memory),
            storage: usable(Some(self.storage)).unwrap_or(defaults.storage),
        }
    }
}

/// Resource amounts a pod's cost is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// CPU cores of the host node
    pub cpu: f64,
    /// Memory of the host node in GB
    pub memory: f64,
    /// Storage claimed by the pod in GB
    pub storage: f64,
}

/// Compute the cost of one pod
pub fn compute_cost(prices: &UnitPrices, usage: &ResourceUsage, node_cost_percentage: f64) -> Cost {
    let share = clamp_share(node_cost_percentage);
    Cost::new(
        prices.cpu * amount(usage.cpu) * share,
        prices.memory * amount(usage.memory) * share,
        prices.storage * amount(usage.storage),
    )
}

/// Sum the four cost fields independently across a pod set
pub fn aggregate<'a, I>(costs: I) -> Cost
where
    I: IntoIterator<Item = &'a Cost>,
{
    costs.into_iter().sum()
}

/// Fixed-point price string for injection into a query
pub fn format_price(price: f64) -> String {
    format!("{:.*}", PRICE_PRECISION, price)
}

/// Everything needed to cost one pod, with fallbacks already applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostInputs {
    pub node_name: Option<String>,
    pub prices: UnitPrices,
    pub usage: ResourceUsage,
    pub node_cost_percentage: f64,
}

impl CostInputs {
    /// Inputs for a pod the graph knows nothing about
    pub fn fallback(prices: &UnitPrices) -> Self {
        Self {
            node_name: None,
            prices: *prices,
            usage: ResourceUsage {
                cpu: DEFAULT_CAPACITY,
                memory: DEFAULT_CAPACITY,
                storage: DEFAULT_CAPACITY,
            },
            node_cost_percentage: DEFAULT_NODE_COST_PERCENTAGE,
        }
    }

    /// Build inputs from a graph record, substituting fallbacks for every
    /// missing numeric field
    pub fn from_record(record: &PodCostRecord, fallback: &UnitPrices) -> Self {
        let node = record.node.first();
        let storage = record
            .pvc
            .iter()
            .map(|claim| usable(claim.storage_capacity).unwrap_or(DEFAULT_CAPACITY))
            .sum();

        Self {
            node_name: node.map(|n| n.name.clone()).filter(|n| !n.is_empty()),
            prices: UnitPrices::resolve(record.cpu_price, record.memory_price, fallback),
            usage: ResourceUsage {
                cpu: node
                    .and_then(|n| usable(n.cpu_capacity))
                    .unwrap_or(DEFAULT_CAPACITY),
                memory: node
                    .and_then(|n| usable(n.memory_capacity))
                    .unwrap_or(DEFAULT_CAPACITY),
                storage,
            },
            node_cost_percentage: usable(record.node_cost_percentage)
                .unwrap_or(DEFAULT_NODE_COST_PERCENTAGE),
        }
    }

    pub fn cost(&self) -> Cost {
        compute_cost(&self.prices, &self.usage, self.node_cost_percentage)
    }
}

/// Finite and non-negative, with `-0.0` folded into `0.0`
fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0).map(|v| v + 0.0)
}

fn amount(value: f64) -> f64 {
    usable(Some(value)).unwrap_or(0.0)
}

fn clamp_share(percentage: f64) -> f64 {
    if percentage.is_finite() {
        percentage.clamp(0.0, 1.0) + 0.0
    } else {
        0.0
    }
}
