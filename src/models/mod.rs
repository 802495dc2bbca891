//! podgraph model layer
//!
//! Typed views of the resource graph's vertices and the derived cost type.

pub mod cost;
pub mod pod;
pub mod resource_kind;

pub use cost::Cost;
pub use pod::{ClaimRecord, NamedNode, NodeRecord, Pod, PodCostRecord, PodInteraction};
pub use resource_kind::ResourceKind;
