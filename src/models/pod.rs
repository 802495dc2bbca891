//! Pod records as stored in the resource graph
//!
//! Every predicate except the identifiers is optional in the graph. Absent
//! fields deserialize to `None` or an empty edge list; they are never a
//! decode error.

use serde::{Deserialize, Serialize};

/// A pod vertex
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub xid: String,
    #[serde(default)]
    pub name: String,
    /// Termination timestamp; `None` for a live pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_cost_percentage: Option<f64>,
    /// Outbound `pod` edges (pods this pod talks to)
    #[serde(default, rename = "pod", skip_serializing_if = "Vec::is_empty")]
    pub outbound: Vec<PodInteraction>,
    /// Services selecting this pod (`~pod` filtered to services)
    #[serde(default, rename = "cid", skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<NamedNode>,
}

impl Pod {
    /// A pod is live until the ingestion pipeline records an `endTime`
    pub fn is_live(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Target of an outbound interaction edge, with the edge's facet count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodInteraction {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
}

/// Any vertex projected by name only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedNode {
    #[serde(default)]
    pub name: String,
}

/// Host node of a pod, as far as cost attribution needs it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cpu_capacity: Option<f64>,
    #[serde(default)]
    pub memory_capacity: Option<f64>,
}

/// Persistent volume claim mounted by a pod
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub storage_capacity: Option<f64>,
}

/// Everything the cost engine reads from the graph for one pod
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodCostRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cpu_price: Option<f64>,
    #[serde(default)]
    pub memory_price: Option<f64>,
    #[serde(default)]
    pub node_cost_percentage: Option<f64>,
    #[serde(default)]
    pub node: Vec<NodeRecord>,
    #[serde(default)]
    pub pvc: Vec<ClaimRecord>,
}
