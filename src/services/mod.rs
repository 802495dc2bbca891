//! Service layer
//!
//! Services own the shared handles (graph store, pod lister) and turn
//! requests into query/decode/cost pipelines. The CLI only formats what they
//! return.

pub mod cost_report;
pub mod pod_queries;

pub use cost_report::{CostReport, CostReportService, PodCost};
pub use pod_queries::PodQueryService;
