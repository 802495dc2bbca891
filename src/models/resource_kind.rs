//! Resource kind definitions
//!
//! Every vertex in the resource graph is one of these kinds. A vertex carries
//! a marker predicate (`isPod`, `isContainer`, ...) which is how queries select
//! nodes of a given kind.

use std::fmt;
use std::str::FromStr;

/// Enumeration of all resource kinds stored in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Pod,
    Container,
    Service,
    Label,
    PersistentVolumeClaim,
    Node,
}

impl ResourceKind {
    /// Get the display name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "Pod",
            ResourceKind::Container => "Container",
            ResourceKind::Service => "Service",
            ResourceKind::Label => "Label",
            ResourceKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            ResourceKind::Node => "Node",
        }
    }

    /// Marker predicate present on every vertex of this kind
    pub fn tag(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "isPod",
            ResourceKind::Container => "isContainer",
            ResourceKind::Service => "isService",
            ResourceKind::Label => "isLabel",
            ResourceKind::PersistentVolumeClaim => "isPersistentVolumeClaim",
            ResourceKind::Node => "isNode",
        }
    }

    /// Get all resource kinds
    pub fn all() -> &'static [Self] {
        &[
            ResourceKind::Pod,
            ResourceKind::Container,
            ResourceKind::Service,
            ResourceKind::Label,
            ResourceKind::PersistentVolumeClaim,
            ResourceKind::Node,
        ]
    }

    /// Try to parse a string (case-insensitive, kubectl short names allowed)
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pod" | "pods" | "po" => Some(ResourceKind::Pod),
            "container" | "containers" => Some(ResourceKind::Container),
            "service" | "services" | "svc" => Some(ResourceKind::Service),
            "label" | "labels" => Some(ResourceKind::Label),
            "persistentvolumeclaim" | "persistentvolumeclaims" | "pvc" => {
                Some(ResourceKind::PersistentVolumeClaim)
            }
            "node" | "nodes" | "no" => Some(ResourceKind::Node),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown resource kind: {}", s))
    }
}
