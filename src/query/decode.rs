//! Decoding of graph replies
//!
//! A reply is one JSON object mapping each query block's alias to an ordered
//! list of vertices. Blocks that matched nothing may be missing entirely, so
//! every root defaults its list to empty.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::QueryResult;
use crate::models::{Pod, PodCostRecord};

/// Decode a raw reply into `T`
pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> QueryResult<T> {
    Ok(serde_json::from_slice(raw)?)
}

/// Decode a raw reply without imposing a schema on it
pub fn decode_payload(raw: &[u8]) -> QueryResult<serde_json::Value> {
    decode(raw)
}

/// Reply of queries whose block is aliased `pods`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodsRoot {
    #[serde(default)]
    pub pods: Vec<Pod>,
}

/// Reply of the per-pod price lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceRoot {
    #[serde(default)]
    pub pod: Vec<Pod>,
}

/// Reply of the per-pod cost input lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostInputsRoot {
    #[serde(default)]
    pub pod: Vec<PodCostRecord>,
}
