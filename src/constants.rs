//! Constants used throughout podgraph
//!
//! Centralizes the wildcard sentinel, graph predicate names and the fallback
//! values substituted when a numeric field is missing from the graph.

/// Wildcard sentinel meaning "no name filter, operate over the whole node type"
///
/// `*` is not a valid Kubernetes object name, so it can never collide with a
/// real pod or service.
pub const ALL: &str = "*";

/// Default price of one CPU core for one hour
pub const DEFAULT_CPU_PRICE_PER_CORE_HOUR: f64 = 0.024;

/// Default price of one GB of memory for one hour
pub const DEFAULT_MEMORY_PRICE_PER_GB_HOUR: f64 = 0.01;

/// Default price of one GB of persistent storage for one hour
pub const DEFAULT_STORAGE_PRICE_PER_GB_HOUR: f64 = 0.00013888888;

/// Node cost share used when a pod has no stored `nodeCostPercentage`
pub const DEFAULT_NODE_COST_PERCENTAGE: f64 = 0.0;

/// Capacity used when a node or claim has no stored capacity
pub const DEFAULT_CAPACITY: f64 = 0.0;

/// Fractional digits for every price string injected into a query
pub const PRICE_PRECISION: usize = 11;

/// Pod termination timestamp predicate; absence means the pod is live
pub const END_TIME_PREDICATE: &str = "endTime";

/// Default Dgraph HTTP endpoint (alpha node)
pub const DEFAULT_DGRAPH_URL: &str = "http://localhost:8080";

/// Default timeout for a single graph query
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;
