//! Resource graph queries
//!
//! Builds DQL text for every question podgraph asks, compiles label filters,
//! decodes replies and collapses duplicate vertices.

pub mod builder;
pub mod decode;
pub mod dedup;
pub mod escape;
pub mod labels;

pub use builder::{Edge, QueryIntent, hierarchy_query, pod_metrics_query, require_named};
pub use decode::{CostInputsRoot, PodsRoot, PriceRoot, decode, decode_payload};
pub use dedup::{Identified, unique_ids};
pub use labels::{LabelFilter, LabelSet};
