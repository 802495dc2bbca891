//! podgraph library
//!
//! Query layer and cost attribution over a Kubernetes resource graph held in
//! Dgraph. Used by the podgraph binary and directly by integration tests.

pub mod cli;
pub mod config;
pub mod constants;
pub mod cost;
pub mod error;
pub mod kube;
pub mod models;
pub mod query;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use constants::ALL;
pub use cost::{CostInputs, ResourceUsage, UnitPrices, aggregate, compute_cost, format_price};
pub use error::{QueryError, QueryResult, StoreError};
pub use models::{Cost, Pod, ResourceKind};
pub use query::{LabelFilter, LabelSet, QueryIntent};
pub use services::{CostReport, CostReportService, PodCost, PodQueryService};
pub use store::{DgraphStore, GraphStore, execute_query};
